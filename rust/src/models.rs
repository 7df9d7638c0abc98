//! Core data types for the scheduling system.
//!
//! Inputs are plain snapshots supplied by the caller (`Task`, `SequencedTask`,
//! `Meeting`). The scheduler flattens them into `WorkItem`s and returns an
//! `OptimizationResult` that owns everything it reports.

use chrono::{NaiveDate, NaiveDateTime};

/// Priority assigned to work items whose source does not specify one.
pub const DEFAULT_PRIORITY: i32 = 50;

/// Upper bound on a single duration or async wait, one year in minutes.
pub const MAX_ITEM_MINUTES: i64 = 365 * 24 * 60;

/// A standalone task.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Active work in minutes.
    pub duration: i64,
    pub completed: bool,
    pub dependencies: Vec<String>,
    pub deadline: Option<NaiveDateTime>,
    pub priority: Option<i32>,
    pub is_async_trigger: bool,
    /// Passive wait in minutes that starts when the active work ends.
    pub async_wait_time: i64,
    pub cognitive_complexity: Option<u8>,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration,
            ..Default::default()
        }
    }
}

/// One step of a `SequencedTask`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskStep {
    pub id: String,
    pub name: String,
    pub duration: i64,
    /// Explicit dependencies in addition to the preceding step.
    pub depends_on: Vec<String>,
    pub percent_complete: u8,
    pub is_async_trigger: bool,
    pub async_wait_time: i64,
    pub cognitive_complexity: Option<u8>,
}

impl TaskStep {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration,
            ..Default::default()
        }
    }
}

/// A workflow: an ordered list of steps sharing a deadline and priority.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequencedTask {
    pub id: String,
    pub name: String,
    pub completed: bool,
    pub deadline: Option<NaiveDateTime>,
    pub priority: Option<i32>,
    pub steps: Vec<TaskStep>,
}

/// A fixed-time blackout interval `[start, end)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Meeting {
    pub id: String,
    pub name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Meeting {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start,
            end,
        }
    }
}

/// Where a work item came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkItemKind {
    Task,
    WorkflowStep {
        workflow_id: String,
        step_index: usize,
    },
    /// Synthesized by the scheduler after an async trigger completes.
    AsyncWait { trigger_id: String },
}

impl WorkItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::WorkflowStep { .. } => "workflow-step",
            Self::AsyncWait { .. } => "async-wait",
        }
    }

    pub fn is_async_wait(&self) -> bool {
        matches!(self, Self::AsyncWait { .. })
    }
}

/// Unified schedulable unit for tasks and workflow steps.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkItem {
    pub id: String,
    pub name: String,
    pub kind: WorkItemKind,
    pub duration: i64,
    pub priority: i32,
    pub deadline: Option<NaiveDateTime>,
    /// Ids that must be complete (or whose async wait must have elapsed).
    pub dependencies: Vec<String>,
    /// `Some(wait_minutes)` when completing this item starts a passive wait.
    pub async_wait: Option<i64>,
    /// Longest duration-weighted dependency chain ending here, own duration included.
    pub critical_path: i64,
    pub cognitive_complexity: Option<u8>,
}

impl WorkItem {
    pub fn is_async_trigger(&self) -> bool {
        self.async_wait.is_some()
    }
}

/// A work item with a committed interval.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledItem {
    pub item: WorkItem,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl ScheduledItem {
    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn name(&self) -> &str {
        &self.item.name
    }

    pub fn duration_minutes(&self) -> i64 {
        self.item.duration
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Work,
    Break,
    Sleep,
    Meeting,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Break => "break",
            Self::Sleep => "sleep",
            Self::Meeting => "meeting",
        }
    }
}

/// Contiguous span of one kind. Never crosses midnight internally.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkBlock {
    pub id: String,
    pub kind: BlockKind,
    /// Calendar date of `start`.
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Only `Work` blocks carry items.
    pub items: Vec<ScheduledItem>,
    /// Meeting name for `Meeting` blocks.
    pub label: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleMetrics {
    /// Wall-clock minutes from the first start to the latest end.
    pub total_duration: i64,
    pub active_work_time: i64,
    pub async_parallel_time: i64,
    pub deadlines_met: usize,
    pub deadlines_missed: usize,
    pub avg_completion_time: f64,
    pub critical_path_length: i64,
}

/// Result of one scheduling run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptimizationResult {
    pub blocks: Vec<WorkBlock>,
    /// Commit order, async-wait entries included.
    pub schedule: Vec<ScheduledItem>,
    pub metrics: ScheduleMetrics,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl OptimizationResult {
    pub fn blocks_of_kind(&self, kind: BlockKind) -> impl Iterator<Item = &WorkBlock> {
        self.blocks.iter().filter(move |b| b.kind == kind)
    }

    pub fn find_scheduled(&self, id: &str) -> Option<&ScheduledItem> {
        self.schedule.iter().find(|s| s.item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(WorkItemKind::Task.as_str(), "task");
        let step = WorkItemKind::WorkflowStep {
            workflow_id: "wf".to_string(),
            step_index: 2,
        };
        assert_eq!(step.as_str(), "workflow-step");
        let wait = WorkItemKind::AsyncWait {
            trigger_id: "t".to_string(),
        };
        assert_eq!(wait.as_str(), "async-wait");
        assert!(wait.is_async_wait());
        assert!(!step.is_async_wait());
    }

    #[test]
    fn test_task_new_defaults() {
        let task = Task::new("a", "Write report", 45);
        assert_eq!(task.duration, 45);
        assert!(!task.completed);
        assert!(task.dependencies.is_empty());
        assert!(task.priority.is_none());
        assert!(!task.is_async_trigger);
    }
}
