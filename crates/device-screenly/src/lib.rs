pub mod config;
pub mod dispatch;
pub mod routes;
pub mod screenly;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use config::{DeviceEndpoint, Scheme};
pub use dispatch::Dispatcher;
pub use screenly::ScreenlyController;
pub use transport::{HttpTransport, TransportError, TransportRequest, TransportResponse};
