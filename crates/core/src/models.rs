use chrono::{DateTime, SecondsFormat, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const TYPE_IMAGE: &str = "image";
pub const TYPE_WEBPAGE: &str = "webpage";
pub const TYPE_VIDEO: &str = "video";

/// The asset the device is displaying right now
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAsset {
    pub id: String,
    pub name: String,
    /// Content type as reported by the device (`image`, `webpage`, ...)
    #[serde(rename = "type")]
    pub kind: String,
}

/// One row of the device's asset listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub enabled: bool,
    pub active: bool,
}

/// Full asset record as stored on the device
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(deserialize_with = "de_text")]
    pub asset_id: String,
    #[serde(deserialize_with = "de_text")]
    pub name: String,
    #[serde(deserialize_with = "de_text")]
    pub mimetype: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Display duration in seconds
    #[serde(default, deserialize_with = "de_seconds")]
    pub duration: Option<u64>,
    #[serde(default)]
    pub play_order: i64,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_enabled: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub nocache: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_processing: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub skip_asset_check: bool,
}

impl From<&Asset> for AssetSummary {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.asset_id.clone(),
            name: asset.name.clone(),
            kind: asset.mimetype.clone(),
            enabled: asset.is_enabled,
            active: asset.is_active,
        }
    }
}

/// Properties to overlay on an asset during an update.
///
/// Keys are device field names; values are sent as-is and win over the
/// values fetched from the device.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AssetChanges(Map<String, Value>);

impl AssetChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{is_enabled: 1}` or `{is_enabled: 0}`
    pub fn enabled(enabled: bool) -> Self {
        Self::new().set("is_enabled", if enabled { 1 } else { 0 })
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::new().set("name", name.into())
    }

    /// Start and end of the asset's schedule, sent as RFC 3339 with a numeric offset
    pub fn schedule<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self::new()
            .set("start_date", start.to_rfc3339_opts(SecondsFormat::Secs, false))
            .set("end_date", end.to_rfc3339_opts(SecondsFormat::Secs, false))
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Overlay these changes onto `body`, replacing existing keys
    pub fn apply_to(&self, body: &mut Map<String, Value>) {
        for (key, value) in &self.0 {
            body.insert(key.clone(), value.clone());
        }
    }
}

/// Truthiness of a raw device flag.
///
/// The device reports flags as `0`/`1`, booleans or, on some firmware,
/// numeric strings; a numeric string is judged by its value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) => f != 0.0,
            Err(_) => !s.is_empty(),
        },
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(is_truthy(&raw))
}

/// Text field that may come back as `null` or a number
fn de_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected text, got {}", other))),
    }
}

fn de_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid duration: {}", n))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid duration: {:?}", s))),
        other => Err(D::Error::custom(format!("invalid duration: {}", other))),
    }
}
