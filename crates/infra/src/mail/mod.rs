//! Outbound mail delivery.

pub mod recording;
pub mod smtp;

pub use recording::{RecordingMailer, SentMail};
pub use smtp::SmtpMailer;

use thiserror::Error;

/// Any failure while delivering a message. There is no partial-success state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("invalid address {address:?}: {reason}")]
    Address { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("smtp delivery failed: {0}")]
    Smtp(String),
}

/// Delivers a plaintext document to a single recipient.
///
/// Implementations make exactly one delivery attempt per call; callers decide
/// whether to retry.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError>;
}
