use crate::cascade::CascadeStep;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Reminder {id} has already been sent")]
    AlreadySent { id: DbId },

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Deletion failed at step '{step}': {reason}")]
    DeletionFailed { step: CascadeStep, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the caller may retry the same request and expect progress.
    ///
    /// Cascade and delivery failures leave the store in a state that a
    /// second attempt can complete; everything else is terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoreError::DeliveryFailed(_) | CoreError::DeletionFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletion_failed_names_the_step() {
        let err = CoreError::DeletionFailed {
            step: CascadeStep::Milestones,
            reason: "connection reset".into(),
        };
        assert_eq!(
            err.to_string(),
            "Deletion failed at step 'milestones': connection reset"
        );
    }

    #[test]
    fn only_delivery_and_deletion_are_retryable() {
        assert!(CoreError::DeliveryFailed("smtp".into()).is_retryable());
        assert!(CoreError::DeletionFailed {
            step: CascadeStep::Project,
            reason: String::new(),
        }
        .is_retryable());
        assert!(!CoreError::AccessDenied("nope".into()).is_retryable());
        assert!(!CoreError::AlreadySent { id: 1 }.is_retryable());
        assert!(!CoreError::NotFound {
            entity: "Project",
            id: 1
        }
        .is_retryable());
    }
}
