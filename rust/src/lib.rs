//! Greedy deadline- and priority-aware personal scheduler.
//!
//! Turns standalone tasks and multi-step workflows into a concrete timeline
//! that respects dependencies, sleep hours, meetings and work breaks, and
//! overlaps async waits with other work.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use optimal_scheduler::{generate_optimal_schedule, OptimalScheduleConfig, Task};
//!
//! let start = NaiveDate::from_ymd_opt(2025, 9, 8)
//!     .and_then(|d| d.and_hms_opt(8, 0, 0))
//!     .unwrap();
//! let tasks = vec![Task::new("write", "Write report", 90)];
//! let result =
//!     generate_optimal_schedule(&tasks, &[], start, &OptimalScheduleConfig::default()).unwrap();
//! assert_eq!(result.schedule.len(), 1);
//! ```

pub mod config;
pub mod conflicts;
pub mod critical_path;
mod interner;
pub mod logging;
pub mod models;
#[cfg(feature = "python")]
mod python;
pub mod scheduler;
pub mod sorting;
pub mod work_patterns;

pub use config::{ConfigError, OptimalScheduleConfig};
pub use conflicts::{Conflict, ConflictDetector, ConflictKind, SleepWindow};
pub use critical_path::{compute_critical_paths, critical_path_length, DependencyGraph};
pub use models::{
    BlockKind, Meeting, OptimizationResult, ScheduleMetrics, ScheduledItem, SequencedTask, Task,
    TaskStep, WorkBlock, WorkItem, WorkItemKind, DEFAULT_PRIORITY,
};
pub use scheduler::{
    build_work_items, compute_metrics, generate_optimal_schedule, OptimalScheduler,
    SchedulerError,
};
pub use sorting::{compare_candidates, sort_candidates};
pub use work_patterns::{
    optimal_schedule_to_work_patterns, PatternBlock, PatternMeeting, WorkPattern,
};
