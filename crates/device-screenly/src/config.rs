use crate::routes::ApiVersion;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 80;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Where a Screenly device listens and how long to wait for it.
///
/// Built once, handed to the controller, never changed afterwards.
/// Deserializes from a config file table such as:
///
/// ```toml
/// host = "signage.local"
/// port = 8080
/// scheme = "https"
/// timeout_secs = 10
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceEndpoint {
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    scheme: Scheme,
    /// Applied to every request; `None` leaves it to the transport
    #[serde(default, rename = "timeout_secs", with = "timeout_secs")]
    timeout: Option<Duration>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl DeviceEndpoint {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            scheme: Scheme::Http,
            timeout: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// `true` selects https
    pub fn with_encryption(self, encryption: bool) -> Self {
        self.with_scheme(if encryption { Scheme::Https } else { Scheme::Http })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// `{scheme}://{host}:{port}/api`
    pub fn api_base(&self) -> String {
        format!("{}://{}:{}/api", self.scheme.as_str(), self.host, self.port)
    }

    /// `{scheme}://{host}:{port}/api/{version}/{path}`
    pub fn url(&self, version: ApiVersion, path: &str) -> String {
        format!("{}/{}/{}", self.api_base(), version.as_str(), path)
    }
}

mod timeout_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(timeout: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match timeout {
            Some(t) => serializer.serialize_some(&t.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match Option::<f64>::deserialize(deserializer)? {
            None => Ok(None),
            Some(secs) if secs > 0.0 => Duration::try_from_secs_f64(secs)
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid timeout {}: {}", secs, e))),
            Some(secs) => Err(D::Error::custom(format!("invalid timeout: {}", secs))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let endpoint = DeviceEndpoint::new("signage.local");
        assert_eq!(endpoint.port(), 80);
        assert_eq!(endpoint.scheme(), Scheme::Http);
        assert_eq!(endpoint.timeout(), None);
        assert_eq!(endpoint.api_base(), "http://signage.local:80/api");
    }

    #[test]
    fn test_encryption_selects_https() {
        let endpoint = DeviceEndpoint::new("10.0.0.5")
            .with_port(8443)
            .with_encryption(true);
        assert_eq!(
            endpoint.url(ApiVersion::V1_2, "assets"),
            "https://10.0.0.5:8443/api/v1.2/assets"
        );
    }

    #[test]
    fn test_deserialize_from_json_table() {
        let json = r#"{"host": "signage.local", "scheme": "https", "timeout_secs": 2.5}"#;
        let endpoint: DeviceEndpoint = serde_json::from_str(json).unwrap();
        assert_eq!(endpoint.host(), "signage.local");
        assert_eq!(endpoint.port(), 80);
        assert_eq!(endpoint.scheme(), Scheme::Https);
        assert_eq!(endpoint.timeout(), Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_rejects_non_positive_timeout() {
        let json = r#"{"host": "signage.local", "timeout_secs": 0}"#;
        assert!(serde_json::from_str::<DeviceEndpoint>(json).is_err());
    }

    #[test]
    fn test_rejects_overflowing_timeout() {
        let json = r#"{"host": "signage.local", "timeout_secs": 1e30}"#;
        assert!(serde_json::from_str::<DeviceEndpoint>(json).is_err());
    }
}
