//! Candidate ordering for the greedy sequencer.
//!
//! Rules, applied in order until one is decisive:
//! 1. Items with a deadline before items without one
//! 2. Earlier deadline, only when the gap exceeds 24 hours
//! 3. Async triggers before plain items; longer wait first among triggers
//! 4. Longer critical path, only when the gap exceeds 60 minutes
//! 5. Higher priority
//!
//! The thresholds in rules 2 and 4 make the comparison non-transitive, so the
//! list is ordered with a stable insertion sort instead of `slice::sort_by`.

use chrono::Duration;
use std::cmp::Ordering;

use crate::models::WorkItem;

/// Deadlines closer than this are treated as tied.
pub const DEADLINE_TIE_HOURS: i64 = 24;

/// Critical paths closer than this (minutes) are treated as tied.
pub const CRITICAL_PATH_TIE_MINUTES: i64 = 60;

/// Compare two candidates. `Less` means `a` should be scheduled first.
pub fn compare_candidates(a: &WorkItem, b: &WorkItem) -> Ordering {
    match (a.deadline, b.deadline) {
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        (Some(da), Some(db)) => {
            let gap = if da > db { da - db } else { db - da };
            if gap > Duration::hours(DEADLINE_TIE_HOURS) {
                return da.cmp(&db);
            }
        }
        (None, None) => {}
    }

    match (a.async_wait, b.async_wait) {
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        (Some(wa), Some(wb)) if wa != wb => return wb.cmp(&wa),
        _ => {}
    }

    if (a.critical_path - b.critical_path).abs() > CRITICAL_PATH_TIE_MINUTES {
        return b.critical_path.cmp(&a.critical_path);
    }

    b.priority.cmp(&a.priority)
}

/// Order candidates in place. Equal items keep their input order.
pub fn sort_candidates(items: &mut [WorkItem]) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare_candidates(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}
