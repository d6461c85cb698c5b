//! Ownership-based authorization predicate.
//!
//! Managers may touch every project. Everyone else may touch a project only
//! when its recorded creator is their own e-mail. Projects with no recorded
//! creator (legacy rows) are manager-only.

use crate::error::CoreError;
use crate::roles::Actor;

/// A record whose access is decided by the e-mail of its creator.
pub trait Owned {
    fn created_by(&self) -> Option<&str>;
}

/// Decide whether `actor` may read or write `resource`.
pub fn can_access<R: Owned + ?Sized>(actor: &Actor, resource: &R) -> bool {
    if actor.is_manager() {
        return true;
    }
    matches!(resource.created_by(), Some(owner) if owner == actor.email)
}

/// Like [`can_access`] but produces [`CoreError::AccessDenied`] on refusal.
///
/// `action` completes the sentence "You can only ... your own projects".
pub fn ensure_access<R: Owned + ?Sized>(
    actor: &Actor,
    resource: &R,
    action: &str,
) -> Result<(), CoreError> {
    if can_access(actor, resource) {
        Ok(())
    } else {
        Err(CoreError::AccessDenied(format!(
            "You can only {action} your own projects"
        )))
    }
}

/// Owner filter for list queries: `None` means unfiltered (managers),
/// `Some(email)` restricts to records created by that e-mail.
pub fn owner_filter(actor: &Actor) -> Option<&str> {
    if actor.is_manager() {
        None
    } else {
        Some(actor.email.as_str())
    }
}
