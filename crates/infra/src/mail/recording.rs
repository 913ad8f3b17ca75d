//! In-memory mailer for tests and local development.

use std::sync::{Arc, Mutex};

use super::{Mailer, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Records every message instead of sending it. Can be switched to fail every
/// delivery to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
    fail_with: Option<String>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            sent: Arc::default(),
            fail_with: Some(reason.into()),
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<SentMail> {
        self.sent()
            .into_iter()
            .filter(|m| m.to == recipient)
            .collect()
    }
}

#[async_trait::async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError> {
        if let Some(reason) = &self.fail_with {
            tracing::error!(recipient = %to, error = %reason, "failed to send email");
            return Err(TransportError::Smtp(reason.clone()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
        }
        Ok(())
    }
}
