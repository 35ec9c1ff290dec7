use crate::error::Result;
use crate::models::{Asset, AssetChanges, AssetSummary, CurrentAsset};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

/// Trait for signage device controllers
#[async_trait]
pub trait SignageController: Send + Sync {
    /// Label identifying this device (host by default)
    fn id(&self) -> &str;

    /// Asset currently on screen
    async fn get_current_asset(&self) -> Result<CurrentAsset>;

    /// Advance the playback rotation
    async fn next_asset(&self) -> Result<()>;

    /// Step the playback rotation back
    async fn previous_asset(&self) -> Result<()>;

    /// Jump straight to the given asset
    async fn switch_asset(&self, asset_id: &str) -> Result<()>;

    /// All assets known to the device, in device order
    async fn list_assets(&self) -> Result<Vec<AssetSummary>>;

    /// Full record of a single asset
    async fn get_asset(&self, asset_id: &str) -> Result<Asset>;

    /// Fetch the asset, overlay `changes`, write it back.
    ///
    /// Not atomic: a write made by someone else between the fetch and the
    /// write-back is overwritten.
    async fn update_asset(&self, asset_id: &str, changes: AssetChanges) -> Result<()>;

    async fn enable_asset(&self, asset_id: &str) -> Result<()> {
        self.update_asset(asset_id, AssetChanges::enabled(true)).await
    }

    async fn disable_asset(&self, asset_id: &str) -> Result<()> {
        self.update_asset(asset_id, AssetChanges::enabled(false)).await
    }

    async fn rename_asset(&self, asset_id: &str, name: &str) -> Result<()> {
        self.update_asset(asset_id, AssetChanges::name(name)).await
    }

    async fn schedule_asset(
        &self,
        asset_id: &str,
        start: &DateTime<FixedOffset>,
        end: &DateTime<FixedOffset>,
    ) -> Result<()> {
        self.update_asset(asset_id, AssetChanges::schedule(start, end))
            .await
    }

    /// Check if device is reachable and answering sensibly
    async fn is_online(&self) -> bool {
        self.get_current_asset().await.is_ok()
    }
}
