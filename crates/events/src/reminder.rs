//! Reminder e-mail rendering.
//!
//! Bodies are handlebars templates. The HTML template escapes every
//! interpolated value; the reminder message is escaped up front and its line
//! breaks turned into `<br>` so it can be inserted raw.

use handlebars::Handlebars;
use serde::Serialize;
use waypoint_db::models::email_reminder::EmailReminder;

use crate::delivery::{MailError, OutgoingMail};

const DEFAULT_COMPANY_NAME: &str = "Waypoint";
const DEFAULT_APP_URL: &str = "http://localhost:3000";

const HTML_TEMPLATE: &str = "reminder_html";
const TEXT_TEMPLATE: &str = "reminder_text";

const HTML_BODY: &str = r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #2563eb;">{{subject}}</h2>
  <p><strong>Project:</strong> {{project_name}}</p>
  <div style="background-color: #f3f4f6; padding: 20px; border-radius: 8px; margin: 20px 0;">
    {{{message_html}}}
  </div>
  <p style="color: #6b7280; font-size: 12px;">This is an automated reminder from <a href="{{app_url}}" style="color: #2563eb; text-decoration: none;">{{company_name}}</a>.</p>
</div>
"#;

const TEXT_BODY: &str = "{{{subject}}}

Project: {{{project_name}}}

{{{message}}}

---
This is an automated reminder from {{{company_name}}} ({{{app_url}}}).
";

/// Organisation details shown in the reminder footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderBranding {
    pub company_name: String,
    pub app_url: String,
}

impl Default for ReminderBranding {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            app_url: DEFAULT_APP_URL.to_string(),
        }
    }
}

impl ReminderBranding {
    /// | Variable       | Default                 |
    /// |----------------|-------------------------|
    /// | `COMPANY_NAME` | `Waypoint`              |
    /// | `APP_URL`      | `http://localhost:3000` |
    pub fn from_env() -> Self {
        Self {
            company_name: std::env::var("COMPANY_NAME")
                .unwrap_or_else(|_| DEFAULT_COMPANY_NAME.to_string()),
            app_url: std::env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ReminderContext<'a> {
    subject: &'a str,
    project_name: &'a str,
    message: &'a str,
    message_html: String,
    company_name: &'a str,
    app_url: &'a str,
}

/// Renders reminders into deliverable messages.
pub struct ReminderRenderer {
    templates: Handlebars<'static>,
    branding: ReminderBranding,
}

impl ReminderRenderer {
    pub fn new(branding: ReminderBranding) -> Result<Self, MailError> {
        let mut templates = Handlebars::new();
        templates.set_strict_mode(true);
        templates
            .register_template_string(HTML_TEMPLATE, HTML_BODY)
            .map_err(|e| MailError::Template(e.to_string()))?;
        templates
            .register_template_string(TEXT_TEMPLATE, TEXT_BODY)
            .map_err(|e| MailError::Template(e.to_string()))?;
        Ok(Self {
            templates,
            branding,
        })
    }

    /// Build the message for `reminder`, addressed to its recipient.
    pub fn render(
        &self,
        reminder: &EmailReminder,
        project_name: &str,
    ) -> Result<OutgoingMail, MailError> {
        let context = ReminderContext {
            subject: &reminder.subject,
            project_name,
            message: &reminder.message,
            message_html: message_html(&reminder.message),
            company_name: &self.branding.company_name,
            app_url: &self.branding.app_url,
        };
        let html = self
            .templates
            .render(HTML_TEMPLATE, &context)
            .map_err(|e| MailError::Template(e.to_string()))?;
        let text = self
            .templates
            .render(TEXT_TEMPLATE, &context)
            .map_err(|e| MailError::Template(e.to_string()))?;

        Ok(OutgoingMail {
            to: reminder.recipient_email.clone(),
            subject: reminder.subject.clone(),
            html,
            text,
        })
    }
}

fn message_html(message: &str) -> String {
    handlebars::html_escape(message)
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}
