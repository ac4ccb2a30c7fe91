//! Error types for droidgraph-harness
//!
//! Only the edges of the crate can fail: loading facts and configuration,
//! and writing emitted artifacts. Fabrication and synthesis degrade instead
//! of failing and report through `Diagnostic`s.

use thiserror::Error;

use crate::config::ConfigError;
use crate::features::facts::FactsError;
use crate::features::lifecycle::ProtocolParseError;

/// Main error type for droidgraph-harness operations
#[derive(Debug, Error)]
pub enum HarnessError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Facts document rejected
    #[error("Facts error: {0}")]
    Facts(#[from] FactsError),

    /// Configuration rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Custom lifecycle protocol rejected
    #[error("Lifecycle protocol error: {0}")]
    Protocol(#[from] ProtocolParseError),

    /// Artifact serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err: HarnessError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "facts.yaml").into();
        let msg = err.to_string();
        assert!(msg.starts_with("IO error"));
        assert!(msg.contains("facts.yaml"));
    }

    #[test]
    fn test_facts_error_conversion() {
        let err: HarnessError = FactsError::UnsupportedVersion { found: 7 }.into();
        assert!(matches!(err, HarnessError::Facts(_)));
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_result_propagation() {
        fn inner() -> Result<()> {
            Err(ConfigError::UnknownPreset("turbo".to_string()).into())
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert!(err.to_string().contains("turbo"));
    }
}
