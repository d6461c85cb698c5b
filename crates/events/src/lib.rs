//! Outbound notification infrastructure for Waypoint.
//!
//! - [`Mailer`] -- the mail capability the reminder service sends through.
//! - [`SmtpMailer`] -- SMTP delivery via `lettre`, configured by [`EmailConfig`].
//! - [`DisabledMailer`] -- stand-in used when SMTP is not configured.
//! - [`ReminderRenderer`] -- turns a reminder into subject, HTML and text bodies.

pub mod delivery;
pub mod reminder;

pub use delivery::email::{EmailConfig, SmtpMailer};
pub use delivery::{configured_mailer, DisabledMailer, MailError, Mailer, OutgoingMail};
pub use reminder::{ReminderBranding, ReminderRenderer};
