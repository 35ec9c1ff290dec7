//! Fixed table of Screenly API endpoints.

use serde_json::Value;

pub const HTTP_OK: u16 = 200;

pub const ACCEPT_ENCODING: &str = "gzip, deflate";
pub const ACCEPT_HEADER: &str = "application/json";

/// Fields the device requires on an asset PUT; it replaces the whole resource.
pub const ASSET_UPDATE_FIELDS: &[&str] = &[
    "name",
    "mimetype",
    "start_date",
    "end_date",
    "duration",
    "is_enabled",
    "play_order",
    "nocache",
    "uri",
    "skip_asset_check",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiVersion {
    /// Playback control endpoints
    V1,
    /// Asset resource endpoints
    V1_2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V1_2 => "v1.2",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
        }
    }
}

/// A device endpoint. Identifiers are inserted into the path verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route<'a> {
    CurrentAsset,
    NextAsset,
    PreviousAsset,
    SwitchAsset(&'a str),
    Asset(&'a str),
    Assets,
}

impl Route<'_> {
    pub fn path(&self) -> String {
        match self {
            Route::CurrentAsset => "viewer_current_asset".to_string(),
            Route::NextAsset => "assets/control/next".to_string(),
            Route::PreviousAsset => "assets/control/previous".to_string(),
            Route::SwitchAsset(id) => format!("assets/control/asset&{}", id),
            Route::Asset(id) => format!("assets/{}", id),
            Route::Assets => "assets".to_string(),
        }
    }

    /// API version the device serves this endpoint under
    pub fn version(&self) -> ApiVersion {
        match self {
            Route::CurrentAsset | Route::NextAsset | Route::PreviousAsset | Route::SwitchAsset(_) => {
                ApiVersion::V1
            }
            Route::Asset(_) | Route::Assets => ApiVersion::V1_2,
        }
    }
}

/// One call through the dispatcher
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest<'a> {
    pub route: Route<'a>,
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub json: Option<Value>,
    pub version: ApiVersion,
}

impl<'a> ApiRequest<'a> {
    pub fn get(route: Route<'a>) -> Self {
        Self {
            route,
            method: Method::Get,
            query: Vec::new(),
            json: None,
            version: route.version(),
        }
    }

    pub fn put(route: Route<'a>, body: Value) -> Self {
        Self {
            method: Method::Put,
            json: Some(body),
            ..Self::get(route)
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }
}
