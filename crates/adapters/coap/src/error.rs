//! CoAP adapter error types.

use std::time::Duration;

use openmote_app::ports::TransportError;

/// Errors specific to the CoAP adapter.
#[derive(Debug, thiserror::Error)]
pub enum CoapError {
    /// Socket setup, send or receive failed.
    #[error("CoAP socket error")]
    Io(#[from] std::io::Error),

    /// A message could not be serialised.
    #[error("failed to encode CoAP message: {0}")]
    Encode(String),

    /// No response before the deadline.
    #[error("no CoAP response within {0:?}")]
    Timeout(Duration),

    /// The device answered with an error response code.
    #[error("CoAP error response {0}")]
    Status(String),
}

impl CoapError {
    /// Classify an I/O error raised by the client, which reports its own
    /// receive timeouts as `TimedOut` / `WouldBlock`.
    #[must_use]
    pub fn from_io(err: std::io::Error, timeout: Duration) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => Self::Timeout(timeout),
            _ => Self::Io(err),
        }
    }

    /// Convert into a [`TransportError`] for propagation across the port
    /// boundary.
    #[must_use]
    pub fn into_transport(self) -> TransportError {
        match self {
            Self::Io(err) => TransportError::Io(err),
            Self::Timeout(timeout) => TransportError::Timeout(timeout),
            Self::Status(status) => TransportError::Status(status),
            other @ Self::Encode(_) => TransportError::Adapter(Box::new(other)),
        }
    }
}

impl From<CoapError> for TransportError {
    fn from(err: CoapError) -> Self {
        err.into_transport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_timeout_error() {
        let err = CoapError::Timeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "no CoAP response within 5s");
    }

    #[test]
    fn should_classify_timed_out_io_as_timeout() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = CoapError::from_io(io, Duration::from_secs(1));
        assert!(matches!(err, CoapError::Timeout(_)));
    }

    #[test]
    fn should_classify_would_block_io_as_timeout() {
        let io = std::io::Error::new(std::io::ErrorKind::WouldBlock, "would block");
        let err = CoapError::from_io(io, Duration::from_secs(1));
        assert!(matches!(err, CoapError::Timeout(_)));
    }

    #[test]
    fn should_keep_other_io_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = CoapError::from_io(io, Duration::from_secs(1));
        assert!(matches!(err, CoapError::Io(_)));
    }

    #[test]
    fn should_convert_timeout_to_transport_timeout() {
        let err: TransportError = CoapError::Timeout(Duration::from_secs(1)).into();
        assert!(matches!(err, TransportError::Timeout(_)));
    }

    #[test]
    fn should_convert_status_to_transport_status() {
        let err: TransportError = CoapError::Status("NotFound".to_string()).into();
        assert_eq!(err.to_string(), "device answered with NotFound");
    }

    #[test]
    fn should_box_encode_errors_as_adapter_errors() {
        let err: TransportError = CoapError::Encode("option too long".to_string()).into();
        assert!(matches!(err, TransportError::Adapter(_)));
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("option too long"));
    }
}
