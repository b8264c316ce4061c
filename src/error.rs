//! Error types for the edges of the engine: text parsing and configuration.
//!
//! Rules and search never fail; an illegal action is a no-op and a search
//! timeout is a shallower answer. Only input that comes from outside the
//! engine can be rejected.

/// Errors raised while parsing commands or loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum CheckersError {
    /// Coordinate outside `a1`..`f6` or malformed
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Color name other than black/white
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Configuration JSON could not be parsed
    #[error("invalid engine config: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration file could not be read
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for fallible engine operations
pub type Result<T> = std::result::Result<T, CheckersError>;
