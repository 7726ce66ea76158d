//! Error type for the simulator.

use pslang_env::ConfigError;
use thiserror::Error;

/// Errors that can occur while simulating or exporting.
#[derive(Debug, Error)]
pub enum SimError {
    /// Rejected parameters
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV writer failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing an export failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Export bytes were not valid UTF-8
    #[error("Encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result alias for simulator operations.
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_utf8_converts() {
        let err: SimError = String::from_utf8(vec![0xff, 0xfe]).unwrap_err().into();
        assert!(matches!(err, SimError::Utf8(_)));
        assert!(err.to_string().starts_with("Encoding error"));
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: SimError = ConfigError::UnknownModel("gpt-9".into()).into();
        assert_eq!(err.to_string(), "Unknown model: gpt-9");
    }
}
