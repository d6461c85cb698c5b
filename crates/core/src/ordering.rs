//! Deterministic display order for a project's milestones.

use std::cmp::Ordering;

use crate::types::{Date, Timestamp};

/// Fields a milestone exposes for ordering.
pub trait MilestoneSortKey {
    fn is_current(&self) -> bool;
    fn target_date(&self) -> Option<Date>;
    fn created_at(&self) -> Timestamp;
}

/// Current milestones first, then ascending target date with undated
/// milestones last, then newest first.
pub fn compare_milestones<M: MilestoneSortKey>(a: &M, b: &M) -> Ordering {
    b.is_current()
        .cmp(&a.is_current())
        .then_with(|| match (a.target_date(), b.target_date()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.created_at().cmp(&a.created_at()))
}

pub fn sort_milestones<M: MilestoneSortKey>(milestones: &mut [M]) {
    milestones.sort_by(compare_milestones);
}
