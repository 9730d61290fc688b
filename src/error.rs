//! Crate-level error types.
//!
//! [`DeskError`] unifies every error source (configuration, feed transport,
//! REST fetches, JSON, settings persistence, input validation) behind a
//! single enum so callers can match on the variant they care about while
//! still using the `?` operator for easy propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DeskError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    /// A configuration value was missing, malformed, or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// An HTTP request to a data service failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A feed message was not valid JSON or lacked routing fields.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Terminal or filesystem I/O failed.
    #[error("io error: {0}")]
    Io(String),

    /// The persisted settings blob could not be read or written.
    #[error("settings error: {0}")]
    Settings(String),

    /// A numeric or textual input was rejected at a validation boundary.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
