//! Error types for SQLPulse

use std::fmt;

use thiserror::Error;

/// Result type for SQLPulse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of a comparison an operation ran against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Target => write!(f, "target"),
        }
    }
}

/// Error types for SQLPulse
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Failed to extract {side} schema: {source}")]
    SideExtractionError {
        side: Side,
        #[source]
        source: Box<Error>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl Error {
    /// Attach the comparison side to an extraction failure
    pub fn on_side(self, side: Side) -> Self {
        Error::SideExtractionError {
            side,
            source: Box::new(self),
        }
    }
}

/// Convert Serde JSON errors to SQLPulse errors
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SerializationError(error.to_string())
    }
}

/// Convert TOML deserialization errors to SQLPulse errors
impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::ConfigError(format!("Failed to parse config file: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_context_keeps_inner_error() {
        let err = Error::ExtractionError("snapshot not found".to_string()).on_side(Side::Target);

        assert_eq!(
            err.to_string(),
            "Failed to extract target schema: Extraction error: snapshot not found"
        );
        let inner = std::error::Error::source(&err).map(|e| e.to_string());
        assert_eq!(inner.as_deref(), Some("Extraction error: snapshot not found"));
    }
}
