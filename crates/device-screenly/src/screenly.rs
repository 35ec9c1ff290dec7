use crate::config::DeviceEndpoint;
use crate::dispatch::Dispatcher;
use crate::routes::{ApiRequest, Route, ASSET_UPDATE_FIELDS};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use serde_json::{Map, Value};
use signage_core::{
    is_truthy, Asset, AssetChanges, AssetSummary, ControlError, CurrentAsset, Result,
    SignageController,
};

/// Screenly OSE controller using the device's local REST API
///
/// API format: {scheme}://{host}:{port}/api/{version}/{endpoint}
///
/// The HTTP session is borrowed from the caller; any number of controllers
/// may share one `reqwest::Client`.
pub struct ScreenlyController<'t, T: ?Sized = reqwest::Client> {
    label: String,
    dispatcher: Dispatcher<'t, T>,
}

impl<'t, T: HttpTransport + ?Sized> ScreenlyController<'t, T> {
    pub fn new(endpoint: DeviceEndpoint, transport: &'t T) -> Self {
        Self {
            label: endpoint.host().to_string(),
            dispatcher: Dispatcher::new(endpoint, transport),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn endpoint(&self) -> &DeviceEndpoint {
        self.dispatcher.endpoint()
    }

    /// Raw asset record, untouched, for read-modify-write
    async fn fetch_asset_record(&self, asset_id: &str) -> Result<Map<String, Value>> {
        let response = self.dispatcher.send(ApiRequest::get(Route::Asset(asset_id))).await?;
        into_object(response)
    }

    /// Control endpoints answer with a confirmation string we don't need.
    ///
    /// Any JSON body on a 200 counts as success, including falsy ones such
    /// as `false`, `""` or `{}`.
    async fn send_control(&self, route: Route<'_>) -> Result<()> {
        self.dispatcher.send(ApiRequest::get(route)).await?;
        Ok(())
    }
}

#[async_trait]
impl<'t, T: HttpTransport + ?Sized> SignageController for ScreenlyController<'t, T> {
    fn id(&self) -> &str {
        &self.label
    }

    /// Endpoint: GET v1/viewer_current_asset
    /// Response: the full asset record of whatever is on screen
    async fn get_current_asset(&self) -> Result<CurrentAsset> {
        let response = self.dispatcher.send(ApiRequest::get(Route::CurrentAsset)).await?;
        let record = into_object(response)?;

        Ok(CurrentAsset {
            id: string_field(&record, "asset_id")?,
            name: string_field(&record, "name")?,
            kind: string_field(&record, "mimetype")?,
        })
    }

    /// Endpoint: GET v1/assets/control/next
    async fn next_asset(&self) -> Result<()> {
        self.send_control(Route::NextAsset).await
    }

    /// Endpoint: GET v1/assets/control/previous
    async fn previous_asset(&self) -> Result<()> {
        self.send_control(Route::PreviousAsset).await
    }

    /// Endpoint: GET v1/assets/control/asset&{id}
    async fn switch_asset(&self, asset_id: &str) -> Result<()> {
        self.send_control(Route::SwitchAsset(asset_id)).await?;
        tracing::info!("Switched device '{}' to asset '{}'", self.label, asset_id);
        Ok(())
    }

    /// Endpoint: GET v1.2/assets
    /// Response: JSON array of asset records
    async fn list_assets(&self) -> Result<Vec<AssetSummary>> {
        let response = self.dispatcher.send(ApiRequest::get(Route::Assets)).await?;

        let Value::Array(records) = response else {
            return Err(ControlError::UnexpectedShape { expected: "JSON array of assets" });
        };

        let assets = records
            .into_iter()
            .map(|record| summarize(&into_object(record)?))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Found {} assets on device '{}'", assets.len(), self.label);
        Ok(assets)
    }

    /// Endpoint: GET v1.2/assets/{id}
    async fn get_asset(&self, asset_id: &str) -> Result<Asset> {
        let record = self.fetch_asset_record(asset_id).await?;
        for key in ["asset_id", "name", "mimetype"] {
            string_field(&record, key)?;
        }
        let asset = serde_json::from_value(Value::Object(record))?;
        Ok(asset)
    }

    /// Endpoints: GET then PUT v1.2/assets/{id}
    ///
    /// The device replaces the whole resource on PUT, so the whitelisted
    /// fields are copied from the fetched record before `changes` go on top.
    async fn update_asset(&self, asset_id: &str, changes: AssetChanges) -> Result<()> {
        let record = self.fetch_asset_record(asset_id).await?;

        let mut body = Map::new();
        for &key in ASSET_UPDATE_FIELDS {
            let value = record.get(key).ok_or(ControlError::MissingField(key))?;
            body.insert(key.to_string(), value.clone());
        }
        changes.apply_to(&mut body);

        self.dispatcher
            .send(ApiRequest::put(Route::Asset(asset_id), Value::Object(body)))
            .await?;

        tracing::info!("Updated asset '{}' on device '{}'", asset_id, self.label);
        Ok(())
    }
}

fn into_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ControlError::UnexpectedShape { expected: "JSON object" }),
    }
}

fn string_field(record: &Map<String, Value>, key: &'static str) -> Result<String> {
    match record.get(key) {
        None => Err(ControlError::MissingField(key)),
        Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(ControlError::UnexpectedShape { expected: "string field" }),
    }
}

fn flag_field(record: &Map<String, Value>, key: &'static str) -> Result<bool> {
    record
        .get(key)
        .map(is_truthy)
        .ok_or(ControlError::MissingField(key))
}

fn summarize(record: &Map<String, Value>) -> Result<AssetSummary> {
    Ok(AssetSummary {
        id: string_field(record, "asset_id")?,
        name: string_field(record, "name")?,
        kind: string_field(record, "mimetype")?,
        enabled: flag_field(record, "is_enabled")?,
        active: flag_field(record, "is_active")?,
    })
}
