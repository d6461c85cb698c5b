//! Periodic due-reminder sweep.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use waypoint_core::error::CoreError;
use waypoint_core::types::Timestamp;
use waypoint_services::{DeliveryResult, ReminderService};

/// Counts from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Background service delivering scheduled reminders once they fall due.
pub struct ReminderSweeper {
    reminders: ReminderService,
    interval: Duration,
}

impl ReminderSweeper {
    pub fn new(reminders: ReminderService, interval: Duration) -> Self {
        Self {
            reminders,
            interval,
        }
    }

    /// Sweep immediately, then once per interval, until `cancel` fires.
    ///
    /// A failed sweep is logged and retried on the next tick.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Reminder sweeper started"
        );
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Reminder sweeper stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.sweep(Utc::now()).await {
                        tracing::error!(error = %e, "Reminder sweep failed");
                    }
                }
            }
        }
    }

    /// Attempt every reminder due at `now` and log each failure.
    pub async fn sweep(&self, now: Timestamp) -> Result<SweepSummary, CoreError> {
        let outcomes = self.reminders.process_due(now).await?;

        let mut summary = SweepSummary::default();
        for outcome in &outcomes {
            match outcome.result {
                DeliveryResult::Sent => summary.sent += 1,
                DeliveryResult::Error => {
                    summary.failed += 1;
                    tracing::warn!(
                        reminder_id = outcome.reminder_id,
                        error = outcome.error.as_deref().unwrap_or("unknown"),
                        "Reminder left scheduled after failed delivery"
                    );
                }
            }
        }

        if outcomes.is_empty() {
            tracing::debug!("No reminders due");
        }
        Ok(summary)
    }
}
