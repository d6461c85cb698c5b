//! Bounded "current milestone" rotation.
//!
//! A project may flag at most [`MAX_CURRENT_MILESTONES`] milestones as
//! current. Promoting another one demotes the oldest current milestone
//! (by `created_at`, then id) so the bound holds once the promotion lands.

use crate::types::{DbId, Timestamp};

/// Maximum number of milestones per project with `is_current = true`.
pub const MAX_CURRENT_MILESTONES: usize = 2;

/// The fields of a current milestone that rotation looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentSlot {
    pub id: DbId,
    pub created_at: Timestamp,
}

/// Choose which milestones to demote before a promotion.
///
/// `others` are the project's current milestones excluding the one being
/// promoted, in any order. Returns the ids to demote, oldest first.
///
/// When the project already satisfies the bound this yields at most one id.
/// A project left over the bound by concurrent promotions is brought back to
/// it here, so the next promotion heals the overshoot.
pub fn select_demotions(others: &[CurrentSlot]) -> Vec<DbId> {
    let keep = MAX_CURRENT_MILESTONES - 1;
    if others.len() <= keep {
        return Vec::new();
    }

    let mut ordered = others.to_vec();
    ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    ordered
        .into_iter()
        .take(others.len() - keep)
        .map(|slot| slot.id)
        .collect()
}
