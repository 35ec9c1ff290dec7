use crate::config::DeviceEndpoint;
use crate::routes::{ApiRequest, ACCEPT_ENCODING, ACCEPT_HEADER, HTTP_OK};
use crate::transport::{HttpTransport, TransportRequest};
use serde_json::Value;
use signage_core::{ControlError, Result};

/// Builds URLs for a device, sends through the borrowed transport and turns
/// the outcome into JSON or a [`ControlError`].
///
/// Exactly one attempt per call.
pub struct Dispatcher<'t, T: ?Sized> {
    endpoint: DeviceEndpoint,
    transport: &'t T,
}

impl<'t, T: HttpTransport + ?Sized> Dispatcher<'t, T> {
    pub fn new(endpoint: DeviceEndpoint, transport: &'t T) -> Self {
        Self { endpoint, transport }
    }

    pub fn endpoint(&self) -> &DeviceEndpoint {
        &self.endpoint
    }

    pub fn url_for(&self, request: &ApiRequest<'_>) -> String {
        self.endpoint.url(request.version, &request.route.path())
    }

    /// Send `request`; success is a 200 with a JSON body
    pub async fn send(&self, request: ApiRequest<'_>) -> Result<Value> {
        let url = self.url_for(&request);

        tracing::debug!("Sending {} request to endpoint {}", request.method.as_str(), url);

        let transport_request = TransportRequest {
            method: request.method,
            url,
            headers: vec![("Accept-Encoding", ACCEPT_ENCODING), ("Accept", ACCEPT_HEADER)],
            query: request.query,
            json: request.json,
            timeout: self.endpoint.timeout(),
        };

        let response = match self.transport.execute(transport_request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Request to Screenly at {} failed: {:?}", self.endpoint.host(), e);
                return Err(ControlError::transport(e));
            }
        };

        if response.status != HTTP_OK {
            tracing::warn!("Error {} from Screenly at {}", response.status, self.endpoint.host());
            return Err(ControlError::UnexpectedStatus(response.status));
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            tracing::debug!("Screenly at {} returned a non-JSON body: {}", self.endpoint.host(), e);
            ControlError::Decode(e)
        })
    }
}
