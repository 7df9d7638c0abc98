//! Mutable state threaded through one sequencing run.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::conflicts::{Conflict, ConflictKind};
use crate::models::{BlockKind, ScheduledItem, WorkBlock, WorkItem, WorkItemKind};

/// Everything the sequencing loop accumulates.
///
/// Owned by a single `OptimalScheduler::sequence` call and consumed into the
/// result when the loop ends.
#[derive(Debug)]
pub struct SchedulingState {
    pub current_time: NaiveDateTime,
    /// Minutes worked since the last break, sleep or meeting.
    pub continuous_work: i64,
    /// Candidates not yet committed, in sorted order.
    pub remaining: Vec<WorkItem>,
    /// Every candidate id of this run.
    known_ids: FxHashSet<String>,
    completed: FxHashSet<String>,
    /// Trigger id -> instant its async wait elapses.
    async_ready_at: FxHashMap<String, NaiveDateTime>,
    pub schedule: Vec<ScheduledItem>,
    pub blocks: Vec<WorkBlock>,
    open_block: Option<WorkBlock>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    next_block_id: usize,
}

impl SchedulingState {
    pub fn new(candidates: Vec<WorkItem>, start_time: NaiveDateTime) -> Self {
        let known_ids = candidates.iter().map(|i| i.id.clone()).collect();
        Self {
            current_time: start_time,
            continuous_work: 0,
            remaining: candidates,
            known_ids,
            completed: FxHashSet::default(),
            async_ready_at: FxHashMap::default(),
            schedule: Vec::new(),
            blocks: Vec::new(),
            open_block: None,
            warnings: Vec::new(),
            suggestions: Vec::new(),
            next_block_id: 0,
        }
    }

    /// Whether `dep_id` no longer blocks its dependents at `current_time`.
    ///
    /// Ids outside this run count as satisfied.
    pub fn dependency_satisfied(&self, dep_id: &str) -> bool {
        if !self.known_ids.contains(dep_id) {
            return true;
        }
        if let Some(ready_at) = self.async_ready_at.get(dep_id) {
            return *ready_at <= self.current_time;
        }
        self.completed.contains(dep_id)
    }

    pub fn is_ready(&self, item: &WorkItem) -> bool {
        item.dependencies
            .iter()
            .all(|dep| self.dependency_satisfied(dep))
    }

    /// Position of the first remaining candidate whose dependencies are met.
    pub fn next_ready_index(&self) -> Option<usize> {
        self.remaining.iter().position(|item| self.is_ready(item))
    }

    /// Soonest async wait that elapses strictly after `current_time`.
    pub fn next_async_completion(&self) -> Option<NaiveDateTime> {
        self.async_ready_at
            .values()
            .filter(|ready_at| **ready_at > self.current_time)
            .min()
            .copied()
    }

    /// Insert a rest break at the current time and reset the work counter.
    pub fn insert_break(&mut self, minutes: i64) {
        self.close_work_block();
        if minutes > 0 {
            let end = self.current_time + Duration::minutes(minutes);
            self.push_span(BlockKind::Break, self.current_time, end, None);
            self.current_time = end;
        }
        self.continuous_work = 0;
    }

    /// Emit a sleep or meeting block up to the conflict's resume time.
    pub fn skip_conflict(&mut self, conflict: &Conflict) {
        self.close_work_block();
        let kind = match conflict.kind {
            ConflictKind::Sleep => BlockKind::Sleep,
            ConflictKind::Meeting => BlockKind::Meeting,
        };
        if conflict.resume_at > self.current_time {
            self.push_span(
                kind,
                self.current_time,
                conflict.resume_at,
                conflict.label.clone(),
            );
            self.current_time = conflict.resume_at;
        }
        self.continuous_work = 0;
    }

    /// Idle until `until`, counting the gap as rest when it is long enough.
    pub fn wait_until(&mut self, until: NaiveDateTime, rest_threshold: i64) {
        self.close_work_block();
        if (until - self.current_time).num_minutes() >= rest_threshold {
            self.continuous_work = 0;
        }
        self.current_time = self.current_time.max(until);
    }

    /// Place `item` at `current_time` and advance past it.
    ///
    /// Returns the committed entry; async triggers also get a synthesized
    /// wait entry appended after it.
    pub fn commit(&mut self, item: WorkItem) -> ScheduledItem {
        let start = self.current_time;
        let end = start
            .checked_add_signed(Duration::minutes(item.duration))
            .unwrap_or(NaiveDateTime::MAX);
        let async_wait = item.async_wait;

        let scheduled = ScheduledItem {
            item,
            start_time: start,
            end_time: end,
        };
        self.append_to_work_block(&scheduled);
        self.completed.insert(scheduled.item.id.clone());
        self.schedule.push(scheduled.clone());
        self.current_time = end;
        self.continuous_work += scheduled.item.duration;

        if let Some(wait) = async_wait {
            let ready_at = end
                .checked_add_signed(Duration::minutes(wait))
                .unwrap_or(NaiveDateTime::MAX);
            self.async_ready_at
                .insert(scheduled.item.id.clone(), ready_at);
            self.schedule.push(async_wait_entry(&scheduled, wait, ready_at));
            self.suggestions.push(format!(
                "{} starts a {}-minute wait at {}; other work can proceed in parallel until {}",
                scheduled.item.name,
                wait,
                end.format("%Y-%m-%d %H:%M"),
                ready_at.format("%Y-%m-%d %H:%M"),
            ));
        }

        scheduled
    }

    /// Close the in-progress work block, if any.
    pub fn close_work_block(&mut self) {
        if let Some(block) = self.open_block.take() {
            self.blocks.push(block);
        }
    }

    fn append_to_work_block(&mut self, scheduled: &ScheduledItem) {
        let start_date = scheduled.start_time.date();
        if self
            .open_block
            .as_ref()
            .is_some_and(|block| block.date != start_date)
        {
            self.close_work_block();
        }
        if self.open_block.is_none() {
            let block = self.new_block(BlockKind::Work, scheduled.start_time, None);
            self.open_block = Some(block);
        }

        let mut midnight = next_midnight(scheduled.start_time);
        while scheduled.end_time > midnight {
            if let Some(mut block) = self.open_block.take() {
                block.end = last_instant_before(midnight);
                block.items.push(scheduled.clone());
                self.blocks.push(block);
            }
            self.open_block = Some(self.new_block(BlockKind::Work, midnight, None));
            midnight += Duration::days(1);
        }

        if let Some(block) = self.open_block.as_mut() {
            block.end = scheduled.end_time;
            block.items.push(scheduled.clone());
        }
    }

    /// Push a non-work span, split at each midnight it crosses.
    fn push_span(
        &mut self,
        kind: BlockKind,
        start: NaiveDateTime,
        end: NaiveDateTime,
        label: Option<String>,
    ) {
        let mut segment_start = start;
        loop {
            let midnight = next_midnight(segment_start);
            let mut block = self.new_block(kind, segment_start, label.clone());
            if end > midnight {
                block.end = last_instant_before(midnight);
                self.blocks.push(block);
                segment_start = midnight;
            } else {
                block.end = end;
                self.blocks.push(block);
                break;
            }
        }
    }

    fn new_block(
        &mut self,
        kind: BlockKind,
        start: NaiveDateTime,
        label: Option<String>,
    ) -> WorkBlock {
        self.next_block_id += 1;
        WorkBlock {
            id: format!("block-{}", self.next_block_id),
            kind,
            date: start.date(),
            start,
            end: start,
            items: Vec::new(),
            label,
        }
    }
}

fn async_wait_entry(trigger: &ScheduledItem, wait: i64, ready_at: NaiveDateTime) -> ScheduledItem {
    let item = &trigger.item;
    ScheduledItem {
        item: WorkItem {
            id: format!("{}-wait", item.id),
            name: format!("Waiting: {}", item.name),
            kind: WorkItemKind::AsyncWait {
                trigger_id: item.id.clone(),
            },
            duration: wait,
            priority: item.priority,
            deadline: None,
            dependencies: vec![item.id.clone()],
            async_wait: None,
            critical_path: 0,
            cognitive_complexity: None,
        },
        start_time: trigger.end_time,
        end_time: ready_at,
    }
}

/// Start of the day after `at`.
pub(crate) fn next_midnight(at: NaiveDateTime) -> NaiveDateTime {
    at.date().and_time(NaiveTime::default()) + Duration::days(1)
}

/// 23:59:59.999 of the day ending at `midnight`.
fn last_instant_before(midnight: NaiveDateTime) -> NaiveDateTime {
    midnight - Duration::milliseconds(1)
}
