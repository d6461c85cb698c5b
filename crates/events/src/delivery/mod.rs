//! Mail delivery channels.

pub mod email;

use std::sync::Arc;

use async_trait::async_trait;

use self::email::{EmailConfig, SmtpMailer};

/// Error type for mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// A body template failed to compile or render.
    #[error("Email template error: {0}")]
    Template(String),

    /// No SMTP server is configured.
    #[error("Email delivery is not configured (SMTP_HOST is unset)")]
    NotConfigured,
}

/// A fully rendered message ready to hand to a transport. The sender is
/// supplied by the mailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// The capability to send one e-mail.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// Mailer used when SMTP is not configured. Every send fails with
/// [`MailError::NotConfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        tracing::warn!(to = %mail.to, "Dropping e-mail: SMTP is not configured");
        Err(MailError::NotConfigured)
    }
}

/// Build the process mailer: SMTP when configured, otherwise a
/// [`DisabledMailer`].
pub fn configured_mailer(config: Option<&EmailConfig>) -> Result<Arc<dyn Mailer>, MailError> {
    match config {
        Some(config) => {
            tracing::info!(
                host = %config.smtp_host,
                port = config.smtp_port,
                implicit_tls = config.implicit_tls,
                "SMTP mailer configured"
            );
            Ok(Arc::new(SmtpMailer::new(config)?))
        }
        None => {
            tracing::warn!("SMTP_HOST not set; reminder e-mails will not be delivered");
            Ok(Arc::new(DisabledMailer))
        }
    }
}
