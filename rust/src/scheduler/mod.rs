//! Greedy optimal scheduler.
//!
//! Flattens tasks and workflow steps into work items, orders them once, then
//! commits them one at a time while inserting breaks and skipping sleep and
//! meeting conflicts.

mod core;
mod metrics;
mod state;


pub use self::core::{
    build_work_items, generate_optimal_schedule, OptimalScheduler, SchedulerError,
};
pub use metrics::compute_metrics;
pub use state::SchedulingState;
