//! Unified error handling for the footprint-map library.
//!
//! All fallible operations return [`Result`]. Failures are scoped to the
//! current load or analysis operation; none of them are fatal to the
//! process, and the controller stays usable (if stale) after an error.

use crate::layer::ControllerState;

/// Result type alias for footprint-map operations.
pub type Result<T> = std::result::Result<T, FootprintError>;

/// Unified error type for footprint-map operations.
#[derive(Debug, thiserror::Error)]
pub enum FootprintError {
    /// The external data service rejected or failed a query.
    #[error("data service request failed: {message}")]
    Service { message: String },

    /// The render surface rejected a source/layer operation.
    #[error("render surface rejected {operation}: {message}")]
    Surface {
        operation: &'static str,
        message: String,
    },

    /// An operation was issued in a controller state that does not allow it.
    #[error("operation not allowed while controller is {state:?}")]
    InvalidState { state: ControllerState },

    /// Login was attempted with credentials that do not match.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Session state could not be read from or written to disk.
    #[error("session storage error: {0}")]
    SessionIo(#[from] std::io::Error),

    /// Session state could not be encoded or decoded.
    #[error("session state serialization error: {0}")]
    SessionEncode(#[from] serde_json::Error),
}

impl FootprintError {
    /// Wrap a data-service failure message.
    pub fn service(message: impl Into<String>) -> Self {
        FootprintError::Service {
            message: message.into(),
        }
    }

    /// Wrap a render-surface failure for the named operation.
    pub fn surface(operation: &'static str, message: impl Into<String>) -> Self {
        FootprintError::Surface {
            operation,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FootprintError::service("connection refused");
        assert!(err.to_string().contains("connection refused"));

        let err = FootprintError::surface("addSource", "duplicate id");
        assert!(err.to_string().contains("addSource"));
        assert!(err.to_string().contains("duplicate id"));
    }
}
