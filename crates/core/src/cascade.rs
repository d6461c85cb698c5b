//! Ordered plan for deleting a project together with its dependents.
//!
//! Projects own milestones, milestones own weekly-progress entries, and
//! e-mail reminders reference the project directly. None of these rows
//! cascade at the storage level, so the deletion order lives here.

use std::fmt;

use serde::Serialize;

/// One step of a project cascade delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeStep {
    /// Delete every reminder referencing the project.
    Reminders,
    /// Delete weekly-progress rows of the project's milestones.
    WeeklyProgress,
    /// Delete the project's milestones.
    Milestones,
    /// Delete the project row itself.
    Project,
}

impl CascadeStep {
    /// Steps in execution order.
    ///
    /// `Reminders` and `WeeklyProgress` depend only on the project id and the
    /// milestone id set and may run concurrently; both complete before
    /// `Milestones` starts.
    pub const ORDER: [CascadeStep; 4] = [
        CascadeStep::Reminders,
        CascadeStep::WeeklyProgress,
        CascadeStep::Milestones,
        CascadeStep::Project,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CascadeStep::Reminders => "reminders",
            CascadeStep::WeeklyProgress => "weekly_progress",
            CascadeStep::Milestones => "milestones",
            CascadeStep::Project => "project",
        }
    }

    /// Whether this step may overlap with the other independent step.
    pub fn is_independent(self) -> bool {
        matches!(self, CascadeStep::Reminders | CascadeStep::WeeklyProgress)
    }
}

impl fmt::Display for CascadeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row counts removed by a completed cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub reminders: u64,
    pub weekly_progress: u64,
    pub milestones: u64,
    /// `false` when the project row was already gone (re-run of a partial cascade).
    pub project: bool,
}

impl CascadeReport {
    /// Store the outcome of `step`. For [`CascadeStep::Project`] any
    /// non-zero row count means the project row was deleted.
    pub fn record(&mut self, step: CascadeStep, rows: u64) {
        match step {
            CascadeStep::Reminders => self.reminders = rows,
            CascadeStep::WeeklyProgress => self.weekly_progress = rows,
            CascadeStep::Milestones => self.milestones = rows,
            CascadeStep::Project => self.project = rows > 0,
        }
    }

    pub fn dependents(&self) -> u64 {
        self.reminders + self.weekly_progress + self.milestones
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_row_is_deleted_last() {
        assert_eq!(CascadeStep::ORDER.last(), Some(&CascadeStep::Project));
    }

    #[test]
    fn milestones_follow_both_independent_steps() {
        let position = |step| CascadeStep::ORDER.iter().position(|s| *s == step).unwrap();
        let milestones = position(CascadeStep::Milestones);
        for step in CascadeStep::ORDER.iter().filter(|s| s.is_independent()) {
            assert!(position(*step) < milestones);
        }
    }

    #[test]
    fn independent_steps_lead_the_order() {
        let leading = CascadeStep::ORDER
            .iter()
            .take_while(|s| s.is_independent())
            .count();
        let total = CascadeStep::ORDER.iter().filter(|s| s.is_independent()).count();
        assert_eq!(leading, 2);
        assert_eq!(leading, total);
    }

    #[test]
    fn record_fills_the_matching_field() {
        let mut report = CascadeReport::default();
        for (step, rows) in CascadeStep::ORDER.into_iter().zip([4, 7, 2, 1]) {
            report.record(step, rows);
        }
        assert_eq!(
            report,
            CascadeReport {
                reminders: 4,
                weekly_progress: 7,
                milestones: 2,
                project: true,
            }
        );

        report.record(CascadeStep::Project, 0);
        assert!(!report.project);
    }

    #[test]
    fn dependents_excludes_the_project_row() {
        let report = CascadeReport {
            reminders: 1,
            weekly_progress: 3,
            milestones: 2,
            project: true,
        };
        assert_eq!(report.dependents(), 6);
    }
}
