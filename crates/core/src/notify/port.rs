use crate::notify::error::NotifyError;
use async_trait::async_trait;

/// # Summary
/// Outbound notification channel interface.
///
/// # Invariants
/// - Implementations must be `Send` and `Sync` so they can be injected
///   behind an `Arc` into the poll loop.
/// - `notify` must be asynchronous and bound its transport timeout.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// # Summary
    /// Sends a notification with a subject and content body.
    ///
    /// # Logic
    /// 1. Formats the message as the target platform requires.
    /// 2. Sends it over the underlying transport.
    /// 3. Reports success or failure; the caller decides what a failure
    ///    means (for signal alerts: logged and lost, never redelivered).
    ///
    /// # Arguments
    /// * `subject` - The notification headline.
    /// * `content` - The notification body.
    ///
    /// # Returns
    /// * `Ok(())` on delivery.
    /// * `Err(NotifyError)` on transport or platform failure.
    async fn notify(&self, subject: &str, content: &str) -> Result<(), NotifyError>;
}
