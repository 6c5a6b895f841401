//! Error types for vqesim
//!
//! The simulator itself never fails under normal numeric operation; these
//! variants cover state machine misuse, configuration and the binary edge.

use thiserror::Error;

/// Main error type for the simulator crate
#[derive(Error, Debug)]
pub enum SimError {
    /// State machine transition errors
    #[error("Invalid state transition from {from:?} to {to:?}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// State channel closed while a caller was waiting on it
    #[error("Simulator state channel closed")]
    ChannelClosed,

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic errors with context
    #[error("Simulator error: {0}")]
    Generic(String),
}

/// Result type alias for simulator operations
pub type Result<T> = std::result::Result<T, SimError>;

/// Convert anyhow errors to SimError
impl From<anyhow::Error> for SimError {
    fn from(err: anyhow::Error) -> Self {
        SimError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = SimError::ConfigError("interval_ms must be greater than 0".to_string());
        assert!(err.to_string().contains("interval_ms"));
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = SimError::InvalidTransition {
            from: "Idle".to_string(),
            to: "(via Continue)".to_string(),
            reason: "Idle has no tick stream".to_string(),
        };
        assert!(err.to_string().contains("Idle"));
        assert!(err.to_string().contains("Continue"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse: std::result::Result<toml::Value, toml::de::Error> = toml::from_str("a = [");
        let err: SimError = parse.unwrap_err().into();
        assert!(matches!(err, SimError::TomlError(_)));
    }
}
