//! Notification delivery port trait.

use crate::domain::error::SwingbotError;

/// Delivers one formatted text message. Failure is logged by the caller and
/// never rolls back the ledger write.
pub trait NotifyPort {
    fn send_message(&self, text: &str) -> Result<(), SwingbotError>;
}
