use thiserror::Error;

/// # Summary
/// Notification channel error enum.
///
/// # Invariants
/// - Must derive the `Error` trait via `thiserror`.
/// - Delivery failures are logged by the caller and never retried within the
///   same poll cycle.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Network or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration error (e.g. missing token)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error returned by the delivery platform (e.g. Telegram API error)
    #[error("Platform error: {0}")]
    Platform(String),
}
