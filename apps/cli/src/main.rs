mod config;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use config::DeviceArgs;
use serde::Serialize;
use signage_core::{AssetSummary, SignageController};
use signage_device_screenly::ScreenlyController;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Control a Screenly OSE digital signage device
#[derive(Debug, Parser)]
#[command(name = "signage", version)]
struct Cli {
    /// Config file [default: <config dir>/signage/device.toml]
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(flatten)]
    device: DeviceArgs,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the asset on screen
    Current,
    /// Advance to the next asset
    Next,
    /// Go back to the previous asset
    Previous,
    /// Display a specific asset
    Switch { asset_id: String },
    /// List all assets
    List,
    /// Show the full record of an asset
    Show { asset_id: String },
    /// Enable an asset
    Enable { asset_id: String },
    /// Disable an asset
    Disable { asset_id: String },
    /// Rename an asset
    Rename { asset_id: String, name: String },
    /// Set when an asset is shown
    Schedule {
        asset_id: String,
        /// RFC 3339 start, e.g. 2024-01-01T08:00:00+00:00
        #[arg(long, value_parser = parse_timestamp)]
        start: DateTime<FixedOffset>,
        /// RFC 3339 end
        #[arg(long, value_parser = parse_timestamp)]
        end: DateTime<FixedOffset>,
    },
    /// Check whether the device answers
    Status,
}

fn parse_timestamp(s: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("invalid RFC 3339 timestamp: {}", e))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,signage=info,signage_device_screenly=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let file = config::load(cli.config.as_deref())?;
    let endpoint = config::resolve_endpoint(&cli.device, file)?;

    tracing::debug!("Using device API at {}", endpoint.api_base());

    // The session outlives the controller that borrows it
    let http = reqwest::Client::new();
    let screenly = ScreenlyController::new(endpoint, &http);
    let json = cli.json;

    match cli.command {
        Command::Current => {
            let asset = screenly
                .get_current_asset()
                .await
                .context("Failed to query current asset")?;
            print_value(json, &asset, || format!("{} [{}] {}", asset.id, asset.kind, asset.name))?;
        }
        Command::Next => {
            screenly.next_asset().await.context("Failed to advance to next asset")?;
            print_done(json, "Advanced to next asset")?;
        }
        Command::Previous => {
            screenly
                .previous_asset()
                .await
                .context("Failed to go back to previous asset")?;
            print_done(json, "Went back to previous asset")?;
        }
        Command::Switch { asset_id } => {
            screenly
                .switch_asset(&asset_id)
                .await
                .with_context(|| format!("Failed to switch to asset {}", asset_id))?;
            print_done(json, &format!("Switched to asset {}", asset_id))?;
        }
        Command::List => {
            let assets = screenly.list_assets().await.context("Failed to list assets")?;
            print_value(json, &assets, || {
                assets
                    .iter()
                    .map(|a| {
                        format!(
                            "{}  {:<8} {:<8} {:<6} {}",
                            a.id,
                            a.kind,
                            if a.enabled { "enabled" } else { "disabled" },
                            if a.active { "active" } else { "" },
                            a.name
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Command::Show { asset_id } => {
            let asset = screenly
                .get_asset(&asset_id)
                .await
                .with_context(|| format!("Failed to fetch asset {}", asset_id))?;
            print_value(json, &asset, || {
                let summary = AssetSummary::from(&asset);
                format!(
                    "{} [{}] {}\n  enabled: {}  active: {}\n  uri: {}\n  schedule: {} .. {}\n  duration: {}",
                    summary.id,
                    summary.kind,
                    summary.name,
                    summary.enabled,
                    summary.active,
                    asset.uri,
                    asset.start_date.as_deref().unwrap_or("-"),
                    asset.end_date.as_deref().unwrap_or("-"),
                    asset
                        .duration
                        .map(|secs| format!("{}s", secs))
                        .unwrap_or_else(|| "-".to_string()),
                )
            })?;
        }
        Command::Enable { asset_id } => {
            screenly
                .enable_asset(&asset_id)
                .await
                .with_context(|| format!("Failed to enable asset {}", asset_id))?;
            print_done(json, &format!("Enabled asset {}", asset_id))?;
        }
        Command::Disable { asset_id } => {
            screenly
                .disable_asset(&asset_id)
                .await
                .with_context(|| format!("Failed to disable asset {}", asset_id))?;
            print_done(json, &format!("Disabled asset {}", asset_id))?;
        }
        Command::Rename { asset_id, name } => {
            screenly
                .rename_asset(&asset_id, &name)
                .await
                .with_context(|| format!("Failed to rename asset {}", asset_id))?;
            print_done(json, &format!("Renamed asset {} to {:?}", asset_id, name))?;
        }
        Command::Schedule { asset_id, start, end } => {
            if end <= start {
                return Err(anyhow!("Schedule end {} is not after start {}", end, start));
            }
            screenly
                .schedule_asset(&asset_id, &start, &end)
                .await
                .with_context(|| format!("Failed to schedule asset {}", asset_id))?;
            print_done(json, &format!("Scheduled asset {} from {} to {}", asset_id, start, end))?;
        }
        Command::Status => {
            let online = screenly.is_online().await;
            print_value(json, &serde_json::json!({ "device": screenly.id(), "online": online }), || {
                format!("{} is {}", screenly.id(), if online { "online" } else { "offline" })
            })?;
            if !online {
                return Err(anyhow!("Device {} is offline", screenly.id()));
            }
        }
    }

    Ok(())
}

fn print_value<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn print_done(json: bool, message: &str) -> Result<()> {
    print_value(json, &serde_json::json!({ "ok": true }), || message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_switch_with_device_flags() {
        let cli = Cli::try_parse_from([
            "signage", "--host", "signage.local", "--port", "8080", "switch", "abc",
        ])
        .unwrap();
        assert_eq!(cli.device.host.as_deref(), Some("signage.local"));
        assert_eq!(cli.device.port, Some(8080));
        assert!(matches!(cli.command, Command::Switch { ref asset_id } if asset_id == "abc"));
    }

    #[test]
    fn test_parse_schedule() {
        let cli = Cli::try_parse_from([
            "signage",
            "schedule",
            "abc",
            "--start",
            "2024-01-01T08:00:00+00:00",
            "--end",
            "2024-12-31T18:00:00+00:00",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Schedule { .. }));
    }

    #[test]
    fn test_rejects_bad_timestamp() {
        let result = Cli::try_parse_from([
            "signage", "schedule", "abc", "--start", "yesterday", "--end", "today",
        ]);
        assert!(result.is_err());
    }
}
