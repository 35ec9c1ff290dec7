use thiserror::Error;

pub type Result<T> = std::result::Result<T, ControlError>;

/// Why a control operation did not succeed.
///
/// Every public operation either returns fully shaped data or one of these.
/// Callers that only need the old "did it work" answer can use `is_ok()`.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Connection refused, DNS failure, timeout or protocol error
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The device answered with anything other than 200
    #[error("unexpected status {0} from device")]
    UnexpectedStatus(u16),

    /// A 200 response whose body is not JSON
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The JSON payload lacks a key the operation needs
    #[error("response is missing field `{0}`")]
    MissingField(&'static str),

    /// The JSON payload (or one of its fields) has the wrong kind
    #[error("unexpected response shape: expected {expected}")]
    UnexpectedShape { expected: &'static str },
}

impl ControlError {
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }

    /// True when the device was never reached or never answered.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// True when the device answered but the answer was unusable.
    pub fn is_payload(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::MissingField(_) | Self::UnexpectedShape { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(ControlError::transport(io).is_transport());
        assert!(ControlError::MissingField("mimetype").is_payload());
        assert!(!ControlError::UnexpectedStatus(404).is_payload());
        assert!(!ControlError::UnexpectedStatus(404).is_transport());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ControlError::MissingField("asset_id").to_string(),
            "response is missing field `asset_id`"
        );
        assert_eq!(
            ControlError::UnexpectedStatus(500).to_string(),
            "unexpected status 500 from device"
        );
    }
}
