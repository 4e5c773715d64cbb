//! Error types for the telemetry anomaly filter and its surrounding services.

use thiserror::Error;

/// Result type alias for pvwatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for pvwatch operations
#[derive(Debug, Error)]
pub enum Error {
    /// Input is not a JSON array of telemetry objects with the required
    /// numeric/datetime fields. Fatal for the call, no retry.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Investigation store error
    #[error("Store error: {0}")]
    Store(String),

    /// Record not found in the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// LLM transport error
    #[error("LLM request failed: {0}")]
    LlmTransport(#[from] reqwest::Error),
}

impl Error {
    /// Create a malformed-input error for a missing or non-numeric field.
    pub fn malformed_field(row: usize, field: &str) -> Self {
        Error::MalformedInput(format!(
            "record {}: missing or non-numeric field '{}'",
            row, field
        ))
    }
}
