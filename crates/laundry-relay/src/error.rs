use thiserror::Error;

/// Relay errors
#[derive(Debug, Error)]
pub enum RelayError {
    /// Subscriber fell behind and missed events
    #[error("Subscriber lagged behind by {0} events")]
    Lagged(u64),

    /// The bus was dropped
    #[error("Event bus closed")]
    Closed,

    /// Event payload did not match the mirrored document type
    #[error("Invalid event payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type RelayResult<T> = Result<T, RelayError>;
