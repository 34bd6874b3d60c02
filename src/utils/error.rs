//! Crate-wide error type.

use thiserror::Error;

/// Errors surfaced by the watcher loop and the notification sink.
///
/// Parse misses and cooldown suppression are not errors; they are normal
/// outcomes of the ingestion pipeline and never reach this type.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O failure while opening or following the log source.
    #[error("log source error: {0}")]
    Io(#[from] std::io::Error),

    /// Webhook delivery failure (timeout, connect error, non-2xx response).
    #[error("notification error: {0}")]
    Notify(String),
}
