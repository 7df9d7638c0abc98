//! Critical path estimation.
//!
//! The critical path of an item is its own duration plus the longest critical
//! path among its dependencies. Cycles are cut rather than rejected.

mod estimator;

pub use estimator::{compute_critical_paths, critical_path_length, DependencyGraph};
