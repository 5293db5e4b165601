use thiserror::Error;

/// Errors surfaced by the logging wrapper.
///
/// Log calls hand back whatever the engine reports; the wrapper itself never
/// recovers from a failed write. Most callers will simply ignore the result
/// of a log call, but it is there for the ones that care.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
