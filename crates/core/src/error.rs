//! Error types for the dividend cadence engine.
//!
//! Classification itself never fails; these errors come from loading and
//! validating configuration or reading event files.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the dividend cadence engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("special_multiplier must be > 1");
        assert_eq!(
            err.to_string(),
            "Configuration error: special_multiplier must be > 1"
        );

        let err = Error::Other("failed to build worker pool".to_string());
        assert_eq!(err.to_string(), "failed to build worker pool");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<u32, serde_json::Error> = serde_json::from_str("nope");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
