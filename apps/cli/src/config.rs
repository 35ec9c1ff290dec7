use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::Deserialize;
use signage_device_screenly::{DeviceEndpoint, Scheme};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Contents of `device.toml`
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub device: Option<DeviceEndpoint>,
}

/// Device flags; each one overrides the config file
#[derive(Debug, Default, Args)]
pub struct DeviceArgs {
    /// Hostname or IP address of the device
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port the device API listens on [default: 80]
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Connect over https
    #[arg(long, global = true)]
    pub https: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<f64>,
}

/// `<config dir>/signage/device.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("signage").join("device.toml"))
}

/// Load the config file.
///
/// An explicit path must exist; the default path is optional.
pub fn load(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(FileConfig::default()),
        },
    };

    tracing::debug!("Loading config from {}", path.display());

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse(&text).with_context(|| format!("Failed to parse config file {}", path.display()))
}

pub fn parse(text: &str) -> Result<FileConfig> {
    Ok(toml::from_str(text)?)
}

/// Merge file settings with command-line overrides
pub fn resolve_endpoint(args: &DeviceArgs, file: FileConfig) -> Result<DeviceEndpoint> {
    let mut endpoint = match (&args.host, file.device) {
        (Some(host), Some(base)) => {
            let endpoint = DeviceEndpoint::new(host.clone())
                .with_port(base.port())
                .with_scheme(base.scheme());
            match base.timeout() {
                Some(timeout) => endpoint.with_timeout(timeout),
                None => endpoint,
            }
        }
        (Some(host), None) => DeviceEndpoint::new(host.clone()),
        (None, Some(base)) => base,
        (None, None) => {
            return Err(anyhow!(
                "No device configured: pass --host or add a [device] table to {}",
                default_config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "device.toml".to_string())
            ))
        }
    };

    if let Some(port) = args.port {
        endpoint = endpoint.with_port(port);
    }
    if args.https {
        endpoint = endpoint.with_scheme(Scheme::Https);
    }
    if let Some(secs) = args.timeout {
        if secs.is_nan() || secs <= 0.0 {
            return Err(anyhow!("Timeout must be a positive number of seconds, got {}", secs));
        }
        let timeout = Duration::try_from_secs_f64(secs)
            .map_err(|e| anyhow!("Timeout of {} seconds is out of range: {}", secs, e))?;
        endpoint = endpoint.with_timeout(timeout);
    }

    Ok(endpoint)
}
