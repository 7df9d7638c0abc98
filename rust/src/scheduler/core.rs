//! Greedy sequencing of tasks and workflow steps into a dated schedule.

use chrono::{Duration, NaiveDateTime};
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::config::{ConfigError, OptimalScheduleConfig};
use crate::conflicts::{ConflictDetector, SleepWindow};
use crate::critical_path::compute_critical_paths;
use crate::models::{
    OptimizationResult, SequencedTask, Task, WorkItem, WorkItemKind, DEFAULT_PRIORITY,
    MAX_ITEM_MINUTES,
};
use crate::sorting::sort_candidates;
use crate::{log_changes, log_checks, log_debug};

use super::metrics::compute_metrics;
use super::state::SchedulingState;

/// Errors for malformed input. Scheduling outcomes are reported as warnings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Negative duration on work item {0}")]
    NegativeDuration(String),
    #[error("Duration on work item {0} exceeds {max} minutes", max = MAX_ITEM_MINUTES)]
    DurationOutOfRange(String),
    #[error("Duplicate work item id: {0}")]
    DuplicateItemId(String),
}

/// Deadline/priority-ordered greedy scheduler.
pub struct OptimalScheduler {
    config: OptimalScheduleConfig,
    sleep: SleepWindow,
}

impl OptimalScheduler {
    /// Validate the configuration and build a scheduler.
    pub fn new(config: OptimalScheduleConfig) -> Result<Self, SchedulerError> {
        let sleep = config.validate()?;
        Ok(Self { config, sleep })
    }

    pub fn config(&self) -> &OptimalScheduleConfig {
        &self.config
    }

    /// Run one scheduling pass. Inputs are never mutated.
    pub fn generate(
        &self,
        tasks: &[Task],
        workflows: &[SequencedTask],
        start_time: NaiveDateTime,
    ) -> Result<OptimizationResult, SchedulerError> {
        let verbosity = self.config.verbosity;

        let mut candidates = build_work_items(tasks, workflows)?;
        let critical_paths = compute_critical_paths(&candidates, verbosity);
        for item in &mut candidates {
            item.critical_path = critical_paths.get(&item.id).copied().unwrap_or(item.duration);
        }

        sort_candidates(&mut candidates);
        log_debug!(
            verbosity,
            "Candidate order: {:?}",
            candidates.iter().map(|i| i.id.as_str()).collect::<Vec<_>>()
        );

        let state = self.sequence(candidates, start_time);

        let (metrics, deadline_warnings) = compute_metrics(&state.schedule, &critical_paths);
        let mut warnings = state.warnings;
        warnings.extend(deadline_warnings);

        Ok(OptimizationResult {
            blocks: state.blocks,
            schedule: state.schedule,
            metrics,
            warnings,
            suggestions: state.suggestions,
        })
    }

    fn max_iterations(&self, candidate_count: usize) -> usize {
        self.config
            .max_iterations
            .unwrap_or((candidate_count + self.config.meetings.len() + 1) * 100)
    }

    /// Main sequencing loop.
    fn sequence(&self, candidates: Vec<WorkItem>, start_time: NaiveDateTime) -> SchedulingState {
        let verbosity = self.config.verbosity;
        let detector = ConflictDetector::new(self.sleep, &self.config.meetings);
        let max_iterations = self.max_iterations(candidates.len());
        let mut state = SchedulingState::new(candidates, start_time);
        let mut iterations = 0usize;

        while !state.remaining.is_empty() {
            iterations += 1;
            if iterations > max_iterations {
                log_changes!(verbosity, "Iteration limit {} reached", max_iterations);
                for item in &state.remaining {
                    state.warnings.push(format!(
                        "Could not schedule {} - stopped after {} iterations",
                        item.name, max_iterations
                    ));
                }
                state.remaining.clear();
                break;
            }

            let Some(index) = state.next_ready_index() else {
                match state.next_async_completion() {
                    Some(ready_at) => {
                        log_changes!(
                            verbosity,
                            "Stalled at {}, advancing to {}",
                            state.current_time,
                            ready_at
                        );
                        state.warnings.push(format!(
                            "No work available from {} until {} while waiting on async tasks",
                            state.current_time.format("%Y-%m-%d %H:%M"),
                            ready_at.format("%Y-%m-%d %H:%M"),
                        ));
                        state.wait_until(ready_at, self.config.preferred_break_duration);
                    }
                    None => {
                        log_changes!(
                            verbosity,
                            "{} items blocked on unmet dependencies",
                            state.remaining.len()
                        );
                        for item in &state.remaining {
                            state.warnings.push(format!(
                                "Could not schedule {} - check dependencies",
                                item.name
                            ));
                        }
                        state.remaining.clear();
                    }
                }
                continue;
            };

            if state.continuous_work >= self.config.max_continuous_work {
                let break_end = state
                    .current_time
                    .checked_add_signed(Duration::minutes(self.config.preferred_break_duration))
                    .unwrap_or(state.current_time);
                // Sleep and meeting spans reset continuous work themselves
                if let Some(conflict) = detector.check(state.current_time, break_end) {
                    log_changes!(
                        verbosity,
                        "Break at {} replaced by {:?} until {}",
                        state.current_time,
                        conflict.kind,
                        conflict.resume_at
                    );
                    state.skip_conflict(&conflict);
                    continue;
                }
                log_changes!(
                    verbosity,
                    "Break at {} after {} minutes of work",
                    state.current_time,
                    state.continuous_work
                );
                state.insert_break(self.config.preferred_break_duration);
            }

            let item = &state.remaining[index];
            let start = state.current_time;
            let Some(end) = start.checked_add_signed(Duration::minutes(item.duration)) else {
                let item = state.remaining.remove(index);
                state.warnings.push(format!(
                    "Could not schedule {} - ends past the last representable date",
                    item.name
                ));
                continue;
            };
            log_checks!(
                verbosity,
                "  Considering {} ({} min) at {}",
                item.id,
                item.duration,
                start
            );

            if let Some(conflict) = detector.check(start, end) {
                log_changes!(
                    verbosity,
                    "  {:?} conflict for {} at {}, resuming at {}",
                    conflict.kind,
                    item.id,
                    start,
                    conflict.resume_at
                );
                state.skip_conflict(&conflict);
                continue;
            }

            let item = state.remaining.remove(index);
            let committed = state.commit(item);
            log_changes!(
                verbosity,
                "  Scheduled {} from {} to {}",
                committed.item.id,
                committed.start_time,
                committed.end_time
            );
        }

        state.close_work_block();
        state
    }
}

/// Run the optimal scheduler with a fresh configuration.
pub fn generate_optimal_schedule(
    tasks: &[Task],
    workflows: &[SequencedTask],
    start_time: NaiveDateTime,
    config: &OptimalScheduleConfig,
) -> Result<OptimizationResult, SchedulerError> {
    OptimalScheduler::new(config.clone())?.generate(tasks, workflows, start_time)
}

/// Flatten incomplete tasks and workflow steps into work items.
///
/// Steps depend on their preceding step plus any explicit `depends_on` ids.
pub fn build_work_items(
    tasks: &[Task],
    workflows: &[SequencedTask],
) -> Result<Vec<WorkItem>, SchedulerError> {
    let mut items = Vec::new();
    let mut seen: FxHashSet<String> = FxHashSet::default();

    for task in tasks.iter().filter(|t| !t.completed) {
        check_minutes(&task.id, task.duration)?;
        if task.is_async_trigger {
            check_minutes(&task.id, task.async_wait_time)?;
        }
        if !seen.insert(task.id.clone()) {
            return Err(SchedulerError::DuplicateItemId(task.id.clone()));
        }
        items.push(WorkItem {
            id: task.id.clone(),
            name: task.name.clone(),
            kind: WorkItemKind::Task,
            duration: task.duration,
            priority: task.priority.unwrap_or(DEFAULT_PRIORITY),
            deadline: task.deadline,
            dependencies: dedup_ids(task.dependencies.iter()),
            async_wait: task.is_async_trigger.then_some(task.async_wait_time),
            critical_path: task.duration,
            cognitive_complexity: task.cognitive_complexity,
        });
    }

    for workflow in workflows.iter().filter(|w| !w.completed) {
        for (index, step) in workflow.steps.iter().enumerate() {
            if step.percent_complete >= 100 {
                continue;
            }
            check_minutes(&step.id, step.duration)?;
            if step.is_async_trigger {
                check_minutes(&step.id, step.async_wait_time)?;
            }
            if !seen.insert(step.id.clone()) {
                return Err(SchedulerError::DuplicateItemId(step.id.clone()));
            }

            let previous = index
                .checked_sub(1)
                .and_then(|prev| workflow.steps.get(prev))
                .map(|prev| &prev.id);
            items.push(WorkItem {
                id: step.id.clone(),
                name: step.name.clone(),
                kind: WorkItemKind::WorkflowStep {
                    workflow_id: workflow.id.clone(),
                    step_index: index,
                },
                duration: step.duration,
                priority: workflow.priority.unwrap_or(DEFAULT_PRIORITY),
                deadline: workflow.deadline,
                dependencies: dedup_ids(previous.into_iter().chain(step.depends_on.iter())),
                async_wait: step.is_async_trigger.then_some(step.async_wait_time),
                critical_path: step.duration,
                cognitive_complexity: step.cognitive_complexity,
            });
        }
    }

    Ok(items)
}

fn check_minutes(id: &str, minutes: i64) -> Result<(), SchedulerError> {
    if minutes < 0 {
        return Err(SchedulerError::NegativeDuration(id.to_string()));
    }
    if minutes > MAX_ITEM_MINUTES {
        return Err(SchedulerError::DurationOutOfRange(id.to_string()));
    }
    Ok(())
}

fn dedup_ids<'a>(ids: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen: FxHashSet<&'a str> = FxHashSet::default();
    ids.filter_map(|id| seen.insert(id.as_str()).then(|| id.clone()))
        .collect()
}
