//! Lifecycle status enums for projects, milestones and reminders.
//!
//! Statuses are persisted as their kebab-case names in TEXT columns. Each
//! enum converts from `String` so row structs can decode them with
//! `#[sqlx(try_from = "String")]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A status string that names no variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind} status '{value}'. Must be one of: {allowed}")]
pub struct InvalidStatus {
    pub kind: &'static str,
    pub value: String,
    pub allowed: String,
}

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The persisted name of this status.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = InvalidStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(InvalidStatus {
                        kind: $kind,
                        value: other.to_string(),
                        allowed: $name::ALL
                            .iter()
                            .map(|status| status.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidStatus;

            fn try_from(value: String) -> Result<Self, InvalidStatus> {
                value.parse()
            }
        }
    };
}

define_status_enum! {
    /// Project lifecycle status.
    ProjectStatus ("project") {
        #[default]
        Active = "active",
        OnHold = "on-hold",
        Completed = "completed",
    }
}

define_status_enum! {
    /// Milestone progress status.
    MilestoneStatus ("milestone") {
        #[default]
        Pending = "pending",
        InProgress = "in-progress",
        Completed = "completed",
    }
}

define_status_enum! {
    /// Delivery state of an e-mail reminder.
    ReminderStatus ("reminder") {
        #[default]
        Scheduled = "scheduled",
        Sent = "sent",
        Error = "error",
    }
}
