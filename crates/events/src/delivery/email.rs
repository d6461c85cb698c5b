//! E-mail delivery via SMTP.
//!
//! [`SmtpMailer`] wraps the `lettre` async SMTP transport and sends
//! multipart (plain text + HTML) messages. Configuration is loaded from
//! environment variables; if `SMTP_HOST` is not set, [`EmailConfig::from_env`]
//! returns `None` and a [`super::DisabledMailer`] should be used instead.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{MailError, Mailer, OutgoingMail};

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (implicit TLS).
const DEFAULT_SMTP_PORT: u16 = 465;

/// Port on which implicit TLS is assumed when `SMTP_IMPLICIT_TLS` is unset.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@waypoint.local";

/// Default sender display name when `SMTP_FROM_NAME` is not set.
const DEFAULT_FROM_NAME: &str = "Waypoint";

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 465).
    pub smtp_port: u16,
    /// Connect with TLS from the first byte instead of STARTTLS.
    pub implicit_tls: bool,
    /// Sender address.
    pub from_address: String,
    /// Sender display name.
    pub from_name: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that e-mail
    /// delivery is not configured.
    ///
    /// | Variable            | Required | Default                   |
    /// |---------------------|----------|---------------------------|
    /// | `SMTP_HOST`         | yes      | -                         |
    /// | `SMTP_PORT`         | no       | `465`                     |
    /// | `SMTP_IMPLICIT_TLS` | no       | `true` when port is 465   |
    /// | `SMTP_FROM`         | no       | `noreply@waypoint.local`  |
    /// | `SMTP_FROM_NAME`    | no       | `Waypoint`                |
    /// | `SMTP_USER`         | no       | -                         |
    /// | `SMTP_PASSWORD`     | no       | -                         |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        let smtp_port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);
        Some(Self {
            smtp_host,
            smtp_port,
            implicit_tls: std::env::var("SMTP_IMPLICIT_TLS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(smtp_port == IMPLICIT_TLS_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            from_name: std::env::var("SMTP_FROM_NAME")
                .unwrap_or_else(|_| DEFAULT_FROM_NAME.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }

    /// The `From` mailbox, rendered as `"name" <address>`.
    pub fn sender(&self) -> Result<Mailbox, MailError> {
        Ok(Mailbox::new(
            Some(self.from_name.clone()),
            self.from_address.parse()?,
        ))
    }
}

// ---------------------------------------------------------------------------
// SmtpMailer
// ---------------------------------------------------------------------------

/// Sends e-mail through an SMTP relay.
pub struct SmtpMailer {
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the transport. Fails if the host or sender address is invalid;
    /// no connection is opened until the first send.
    pub fn new(config: &EmailConfig) -> Result<Self, MailError> {
        let builder = if config.implicit_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        };
        let mut builder = builder.port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            sender: config.sender()?,
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(mail.to.parse()?)
            .subject(mail.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                mail.text.clone(),
                mail.html.clone(),
            ))
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport.send(message).await?;

        tracing::info!(to = %mail.to, subject = %mail.subject, "Reminder e-mail sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
