//! SMTP relay delivery over STARTTLS.

use lettre::address::AddressError;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::config::SmtpConfig;

use super::{Mailer, TransportError};

/// Sends mail through the configured relay.
///
/// Each `send` opens a fresh connection, upgrades it with STARTTLS,
/// authenticates, transmits, and drops the transport. No timeout is applied
/// beyond what the transport itself enforces.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn mailbox(address: &str) -> Result<Mailbox, TransportError> {
        address
            .parse::<Mailbox>()
            .map_err(|e: AddressError| TransportError::Address {
                address: address.to_string(),
                reason: e.to_string(),
            })
    }

    fn build_message(&self, to: &str, subject: &str, body: &str) -> Result<Message, TransportError> {
        Message::builder()
            .from(Self::mailbox(&self.config.username)?)
            .to(Self::mailbox(to)?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| TransportError::Message(e.to_string()))
    }

    async fn deliver(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError> {
        let message = self.build_message(to, subject, body)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.server)
            .map_err(|e| TransportError::Smtp(e.to_string()))?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| TransportError::Smtp(e.to_string()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError> {
        match self.deliver(to, subject, body).await {
            Ok(()) => {
                info!(recipient = %to, "email sent");
                Ok(())
            }
            Err(e) => {
                error!(recipient = %to, error = %e, "failed to send email");
                Err(e)
            }
        }
    }
}
