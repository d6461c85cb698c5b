//! E-mail reminders: scheduling, manual sends and the due-reminder sweep.
//!
//! A failed delivery leaves the reminder `scheduled` so it is picked up by
//! the next sweep. The `error` status is only ever set explicitly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use waypoint_core::access::owner_filter;
use waypoint_core::error::CoreError;
use waypoint_core::roles::Actor;
use waypoint_core::status::ReminderStatus;
use waypoint_core::types::{DbId, Timestamp};
use waypoint_core::validation::{require, require_email, require_text};
use waypoint_db::models::email_reminder::{CreateEmailReminder, EmailReminder, ReminderListing};
use waypoint_db::RecordStore;
use waypoint_events::{Mailer, ReminderRenderer};

use crate::authz::authorize_project;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateReminderInput {
    pub project_id: Option<DbId>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub recipient_email: Option<String>,
    pub reminder_date: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReminderInput {
    pub status: Option<ReminderStatus>,
}

/// Result of one delivery attempt in a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryResult {
    Sent,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    pub reminder_id: DbId,
    pub result: DeliveryResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct ReminderService {
    store: Arc<dyn RecordStore>,
    mailer: Arc<dyn Mailer>,
    renderer: Arc<ReminderRenderer>,
}

impl ReminderService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        mailer: Arc<dyn Mailer>,
        renderer: Arc<ReminderRenderer>,
    ) -> Self {
        Self {
            store,
            mailer,
            renderer,
        }
    }

    /// Reminders on projects visible to `actor`, earliest first.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<ReminderListing>, CoreError> {
        Ok(self.store.list_reminders(owner_filter(actor)).await?)
    }

    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateReminderInput,
    ) -> Result<EmailReminder, CoreError> {
        let project_id = require("project_id", input.project_id)?;
        let create = CreateEmailReminder {
            project_id,
            subject: require_text("subject", input.subject.as_deref())?,
            message: require_text("message", input.message.as_deref())?,
            recipient_email: require_email("recipient_email", input.recipient_email.as_deref())?,
            reminder_date: require("reminder_date", input.reminder_date)?,
        };
        authorize_project(self.store.as_ref(), actor, project_id, "create reminders for").await?;

        let reminder = self.store.insert_reminder(&create).await?;
        tracing::info!(
            reminder_id = reminder.id,
            project_id,
            reminder_date = %reminder.reminder_date,
            "Reminder scheduled"
        );
        Ok(reminder)
    }

    /// Set the status. An empty update returns the reminder unchanged.
    pub async fn update(
        &self,
        actor: &Actor,
        id: DbId,
        input: UpdateReminderInput,
    ) -> Result<EmailReminder, CoreError> {
        let reminder = self.authorize(actor, id, "update reminders for").await?.0;
        let Some(status) = input.status else {
            return Ok(reminder);
        };

        let updated = self
            .store
            .set_reminder_status(id, status)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "EmailReminder",
                id,
            })?;
        tracing::info!(reminder_id = id, status = %status, "Reminder status updated");
        Ok(updated)
    }

    pub async fn delete(&self, actor: &Actor, id: DbId) -> Result<(), CoreError> {
        self.authorize(actor, id, "delete reminders for").await?;
        self.store.delete_reminder(id).await?;
        tracing::info!(reminder_id = id, "Reminder deleted");
        Ok(())
    }

    /// Deliver one reminder now. Fails with [`CoreError::AlreadySent`] when
    /// it has gone out before.
    pub async fn send(&self, actor: &Actor, id: DbId) -> Result<EmailReminder, CoreError> {
        let (reminder, project_name) = self.authorize(actor, id, "send reminders for").await?;
        if reminder.status == ReminderStatus::Sent {
            return Err(CoreError::AlreadySent { id });
        }
        self.deliver(&reminder, &project_name).await
    }

    /// Attempt every scheduled reminder due at `now`. Each reminder is tried
    /// independently; failures are reported in the result and do not stop
    /// the batch.
    pub async fn process_due(&self, now: Timestamp) -> Result<Vec<DeliveryOutcome>, CoreError> {
        let due = self.store.list_due_reminders(now).await?;
        let mut outcomes = Vec::with_capacity(due.len());

        for reminder in &due {
            let attempt = match self.store.find_project(reminder.project_id).await {
                Ok(Some(project)) => self.deliver(reminder, &project.name).await.map(|_| ()),
                Ok(None) => Err(CoreError::NotFound {
                    entity: "Project",
                    id: reminder.project_id,
                }),
                Err(e) => Err(e.into()),
            };
            outcomes.push(match attempt {
                Ok(()) => DeliveryOutcome {
                    reminder_id: reminder.id,
                    result: DeliveryResult::Sent,
                    error: None,
                },
                Err(e) => DeliveryOutcome {
                    reminder_id: reminder.id,
                    result: DeliveryResult::Error,
                    error: Some(e.to_string()),
                },
            });
        }

        let failed = outcomes
            .iter()
            .filter(|o| o.result == DeliveryResult::Error)
            .count();
        if !outcomes.is_empty() {
            tracing::info!(due = outcomes.len(), failed, "Processed due reminders");
        }
        Ok(outcomes)
    }

    /// Load reminder `id` and authorize against its project. Returns the
    /// reminder and the project name.
    async fn authorize(
        &self,
        actor: &Actor,
        id: DbId,
        action: &str,
    ) -> Result<(EmailReminder, String), CoreError> {
        let reminder = self
            .store
            .find_reminder(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "EmailReminder",
                id,
            })?;
        let project =
            authorize_project(self.store.as_ref(), actor, reminder.project_id, action).await?;
        Ok((reminder, project.name))
    }

    /// Render and send, then mark the reminder sent.
    async fn deliver(
        &self,
        reminder: &EmailReminder,
        project_name: &str,
    ) -> Result<EmailReminder, CoreError> {
        let mail = self
            .renderer
            .render(reminder, project_name)
            .map_err(|e| CoreError::DeliveryFailed(e.to_string()))?;

        if let Err(e) = self.mailer.send_mail(&mail).await {
            tracing::warn!(reminder_id = reminder.id, error = %e, "Reminder delivery failed");
            return Err(CoreError::DeliveryFailed(e.to_string()));
        }

        let sent = self
            .store
            .set_reminder_status(reminder.id, ReminderStatus::Sent)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "EmailReminder",
                id: reminder.id,
            })?;
        tracing::info!(reminder_id = reminder.id, to = %reminder.recipient_email, "Reminder sent");
        Ok(sent)
    }
}
