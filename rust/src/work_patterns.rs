//! Per-day display projection of an optimization result.

use chrono::{Duration, NaiveDate, NaiveTime};
use std::collections::BTreeMap;

use crate::models::{BlockKind, OptimizationResult, WorkBlock};

/// Minute of the day that display blocks are clamped to.
const DISPLAY_DAY_END_MINUTE: i64 = 23 * 60 + 59;

#[derive(Clone, Debug, PartialEq)]
pub struct PatternBlock {
    pub id: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub item_ids: Vec<String>,
    pub total_minutes: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternMeeting {
    pub id: String,
    pub name: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Work blocks and meetings of one calendar date.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkPattern {
    pub date: NaiveDate,
    pub blocks: Vec<PatternBlock>,
    pub meetings: Vec<PatternMeeting>,
}

/// Group `work` blocks by date, attaching that date's meetings.
///
/// Dates without work are omitted. A block ending on a later date is clamped
/// to 23:59.
pub fn optimal_schedule_to_work_patterns(result: &OptimizationResult) -> Vec<WorkPattern> {
    let mut by_date: BTreeMap<NaiveDate, WorkPattern> = BTreeMap::new();

    for block in result.blocks_of_kind(BlockKind::Work) {
        let (start, end) = display_span(block);
        let mut item_ids: Vec<String> = Vec::with_capacity(block.items.len());
        for scheduled in &block.items {
            if !item_ids.iter().any(|id| id == scheduled.id()) {
                item_ids.push(scheduled.id().to_string());
            }
        }

        by_date
            .entry(block.date)
            .or_insert_with(|| WorkPattern {
                date: block.date,
                blocks: Vec::new(),
                meetings: Vec::new(),
            })
            .blocks
            .push(PatternBlock {
                id: block.id.clone(),
                start,
                end,
                item_ids,
                total_minutes: (end - start).num_minutes(),
            });
    }

    for block in result.blocks_of_kind(BlockKind::Meeting) {
        if let Some(pattern) = by_date.get_mut(&block.date) {
            let (start, end) = display_span(block);
            pattern.meetings.push(PatternMeeting {
                id: block.id.clone(),
                name: block.label.clone().unwrap_or_default(),
                start,
                end,
            });
        }
    }

    by_date.into_values().collect()
}

fn display_span(block: &WorkBlock) -> (NaiveTime, NaiveTime) {
    let start = block.start.time();
    let end = if block.end.date() > block.date {
        NaiveTime::default() + Duration::minutes(DISPLAY_DAY_END_MINUTE)
    } else {
        block.end.time()
    };
    (start, end)
}
