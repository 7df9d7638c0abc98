//! Python bindings for the optimal scheduler.
//!
//! Wrapper classes mirror the Rust inputs and outputs; conversion happens at
//! the boundary so the core stays free of PyO3 types.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use pyo3::prelude::*;

use crate::config::OptimalScheduleConfig;
use crate::models::{
    Meeting, OptimizationResult, ScheduleMetrics, ScheduledItem, SequencedTask, Task, TaskStep,
    WorkBlock, WorkItemKind,
};
use crate::scheduler::generate_optimal_schedule;
use crate::work_patterns::{optimal_schedule_to_work_patterns, WorkPattern};

#[pyclass(name = "Task")]
#[derive(Clone, Debug)]
pub struct PyTask {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub duration: i64,
    #[pyo3(get, set)]
    pub completed: bool,
    #[pyo3(get, set)]
    pub dependencies: Vec<String>,
    #[pyo3(get, set)]
    pub deadline: Option<NaiveDateTime>,
    #[pyo3(get, set)]
    pub priority: Option<i32>,
    #[pyo3(get, set)]
    pub is_async_trigger: bool,
    #[pyo3(get, set)]
    pub async_wait_time: i64,
    #[pyo3(get, set)]
    pub cognitive_complexity: Option<u8>,
}

#[pymethods]
impl PyTask {
    #[new]
    #[pyo3(signature = (
        id,
        name,
        duration,
        dependencies=None,
        completed=false,
        deadline=None,
        priority=None,
        is_async_trigger=false,
        async_wait_time=0,
        cognitive_complexity=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: String,
        name: String,
        duration: i64,
        dependencies: Option<Vec<String>>,
        completed: bool,
        deadline: Option<NaiveDateTime>,
        priority: Option<i32>,
        is_async_trigger: bool,
        async_wait_time: i64,
        cognitive_complexity: Option<u8>,
    ) -> Self {
        Self {
            id,
            name,
            duration,
            completed,
            dependencies: dependencies.unwrap_or_default(),
            deadline,
            priority,
            is_async_trigger,
            async_wait_time,
            cognitive_complexity,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={:?}, duration={}, deps={})",
            self.id,
            self.duration,
            self.dependencies.len()
        )
    }
}

impl From<&PyTask> for Task {
    fn from(task: &PyTask) -> Self {
        Task {
            id: task.id.clone(),
            name: task.name.clone(),
            duration: task.duration,
            completed: task.completed,
            dependencies: task.dependencies.clone(),
            deadline: task.deadline,
            priority: task.priority,
            is_async_trigger: task.is_async_trigger,
            async_wait_time: task.async_wait_time,
            cognitive_complexity: task.cognitive_complexity,
        }
    }
}

#[pyclass(name = "TaskStep")]
#[derive(Clone, Debug)]
pub struct PyTaskStep {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub duration: i64,
    #[pyo3(get, set)]
    pub depends_on: Vec<String>,
    #[pyo3(get, set)]
    pub percent_complete: u8,
    #[pyo3(get, set)]
    pub is_async_trigger: bool,
    #[pyo3(get, set)]
    pub async_wait_time: i64,
    #[pyo3(get, set)]
    pub cognitive_complexity: Option<u8>,
}

#[pymethods]
impl PyTaskStep {
    #[new]
    #[pyo3(signature = (
        id,
        name,
        duration,
        depends_on=None,
        percent_complete=0,
        is_async_trigger=false,
        async_wait_time=0,
        cognitive_complexity=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: String,
        name: String,
        duration: i64,
        depends_on: Option<Vec<String>>,
        percent_complete: u8,
        is_async_trigger: bool,
        async_wait_time: i64,
        cognitive_complexity: Option<u8>,
    ) -> Self {
        Self {
            id,
            name,
            duration,
            depends_on: depends_on.unwrap_or_default(),
            percent_complete,
            is_async_trigger,
            async_wait_time,
            cognitive_complexity,
        }
    }

    fn __repr__(&self) -> String {
        format!("TaskStep(id={:?}, duration={})", self.id, self.duration)
    }
}

impl From<&PyTaskStep> for TaskStep {
    fn from(step: &PyTaskStep) -> Self {
        TaskStep {
            id: step.id.clone(),
            name: step.name.clone(),
            duration: step.duration,
            depends_on: step.depends_on.clone(),
            percent_complete: step.percent_complete,
            is_async_trigger: step.is_async_trigger,
            async_wait_time: step.async_wait_time,
            cognitive_complexity: step.cognitive_complexity,
        }
    }
}

#[pyclass(name = "SequencedTask")]
#[derive(Clone, Debug)]
pub struct PySequencedTask {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub completed: bool,
    #[pyo3(get, set)]
    pub deadline: Option<NaiveDateTime>,
    #[pyo3(get, set)]
    pub priority: Option<i32>,
    #[pyo3(get, set)]
    pub steps: Vec<PyTaskStep>,
}

#[pymethods]
impl PySequencedTask {
    #[new]
    #[pyo3(signature = (id, name, steps, completed=false, deadline=None, priority=None))]
    fn new(
        id: String,
        name: String,
        steps: Vec<PyTaskStep>,
        completed: bool,
        deadline: Option<NaiveDateTime>,
        priority: Option<i32>,
    ) -> Self {
        Self {
            id,
            name,
            completed,
            deadline,
            priority,
            steps,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SequencedTask(id={:?}, steps={})",
            self.id,
            self.steps.len()
        )
    }
}

impl From<&PySequencedTask> for SequencedTask {
    fn from(workflow: &PySequencedTask) -> Self {
        SequencedTask {
            id: workflow.id.clone(),
            name: workflow.name.clone(),
            completed: workflow.completed,
            deadline: workflow.deadline,
            priority: workflow.priority,
            steps: workflow.steps.iter().map(TaskStep::from).collect(),
        }
    }
}

#[pyclass(name = "Meeting")]
#[derive(Clone, Debug)]
pub struct PyMeeting {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub start: NaiveDateTime,
    #[pyo3(get, set)]
    pub end: NaiveDateTime,
}

#[pymethods]
impl PyMeeting {
    #[new]
    fn new(id: String, name: String, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id,
            name,
            start,
            end,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Meeting(id={:?}, start={}, end={})",
            self.id, self.start, self.end
        )
    }
}

impl From<&PyMeeting> for Meeting {
    fn from(meeting: &PyMeeting) -> Self {
        Meeting::new(
            meeting.id.clone(),
            meeting.name.clone(),
            meeting.start,
            meeting.end,
        )
    }
}

#[pyclass(name = "OptimalScheduleConfig")]
#[derive(Clone, Debug)]
pub struct PyOptimalScheduleConfig {
    #[pyo3(get, set)]
    pub sleep_start: String,
    #[pyo3(get, set)]
    pub sleep_end: String,
    #[pyo3(get, set)]
    pub meetings: Vec<PyMeeting>,
    #[pyo3(get, set)]
    pub preferred_break_interval: i64,
    #[pyo3(get, set)]
    pub preferred_break_duration: i64,
    #[pyo3(get, set)]
    pub max_continuous_work: i64,
    #[pyo3(get, set)]
    pub max_iterations: Option<usize>,
    #[pyo3(get, set)]
    pub verbosity: u8,
}

#[pymethods]
impl PyOptimalScheduleConfig {
    #[new]
    #[pyo3(signature = (
        sleep_start=None,
        sleep_end=None,
        meetings=None,
        preferred_break_interval=None,
        preferred_break_duration=None,
        max_continuous_work=None,
        max_iterations=None,
        verbosity=0
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        sleep_start: Option<String>,
        sleep_end: Option<String>,
        meetings: Option<Vec<PyMeeting>>,
        preferred_break_interval: Option<i64>,
        preferred_break_duration: Option<i64>,
        max_continuous_work: Option<i64>,
        max_iterations: Option<usize>,
        verbosity: u8,
    ) -> Self {
        let defaults = OptimalScheduleConfig::default();
        Self {
            sleep_start: sleep_start.unwrap_or(defaults.sleep_start),
            sleep_end: sleep_end.unwrap_or(defaults.sleep_end),
            meetings: meetings.unwrap_or_default(),
            preferred_break_interval: preferred_break_interval
                .unwrap_or(defaults.preferred_break_interval),
            preferred_break_duration: preferred_break_duration
                .unwrap_or(defaults.preferred_break_duration),
            max_continuous_work: max_continuous_work.unwrap_or(defaults.max_continuous_work),
            max_iterations,
            verbosity,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "OptimalScheduleConfig(sleep={}-{}, meetings={}, max_continuous_work={})",
            self.sleep_start,
            self.sleep_end,
            self.meetings.len(),
            self.max_continuous_work
        )
    }
}

impl From<&PyOptimalScheduleConfig> for OptimalScheduleConfig {
    fn from(config: &PyOptimalScheduleConfig) -> Self {
        OptimalScheduleConfig {
            sleep_start: config.sleep_start.clone(),
            sleep_end: config.sleep_end.clone(),
            meetings: config.meetings.iter().map(Meeting::from).collect(),
            preferred_break_interval: config.preferred_break_interval,
            preferred_break_duration: config.preferred_break_duration,
            max_continuous_work: config.max_continuous_work,
            max_iterations: config.max_iterations,
            verbosity: config.verbosity,
        }
    }
}

#[pyclass(name = "ScheduledItem")]
#[derive(Clone, Debug)]
pub struct PyScheduledItem {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub name: String,
    /// "task", "workflow-step" or "async-wait"
    #[pyo3(get)]
    pub kind: String,
    #[pyo3(get)]
    pub workflow_id: Option<String>,
    #[pyo3(get)]
    pub duration: i64,
    #[pyo3(get)]
    pub priority: i32,
    #[pyo3(get)]
    pub deadline: Option<NaiveDateTime>,
    #[pyo3(get)]
    pub critical_path: i64,
    #[pyo3(get)]
    pub start_time: NaiveDateTime,
    #[pyo3(get)]
    pub end_time: NaiveDateTime,
}

#[pymethods]
impl PyScheduledItem {
    fn __repr__(&self) -> String {
        format!(
            "ScheduledItem(id={:?}, kind={}, start={}, end={})",
            self.id, self.kind, self.start_time, self.end_time
        )
    }
}

impl From<&ScheduledItem> for PyScheduledItem {
    fn from(scheduled: &ScheduledItem) -> Self {
        let item = &scheduled.item;
        let workflow_id = match &item.kind {
            WorkItemKind::WorkflowStep { workflow_id, .. } => Some(workflow_id.clone()),
            WorkItemKind::Task | WorkItemKind::AsyncWait { .. } => None,
        };
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            kind: item.kind.as_str().to_string(),
            workflow_id,
            duration: item.duration,
            priority: item.priority,
            deadline: item.deadline,
            critical_path: item.critical_path,
            start_time: scheduled.start_time,
            end_time: scheduled.end_time,
        }
    }
}

#[pyclass(name = "WorkBlock")]
#[derive(Clone, Debug)]
pub struct PyWorkBlock {
    #[pyo3(get)]
    pub id: String,
    /// "work", "break", "sleep" or "meeting"
    #[pyo3(get)]
    pub kind: String,
    #[pyo3(get)]
    pub date: NaiveDate,
    #[pyo3(get)]
    pub start: NaiveDateTime,
    #[pyo3(get)]
    pub end: NaiveDateTime,
    #[pyo3(get)]
    pub items: Vec<PyScheduledItem>,
    #[pyo3(get)]
    pub label: Option<String>,
}

impl From<&WorkBlock> for PyWorkBlock {
    fn from(block: &WorkBlock) -> Self {
        Self {
            id: block.id.clone(),
            kind: block.kind.as_str().to_string(),
            date: block.date,
            start: block.start,
            end: block.end,
            items: block.items.iter().map(PyScheduledItem::from).collect(),
            label: block.label.clone(),
        }
    }
}

#[pyclass(name = "ScheduleMetrics")]
#[derive(Clone, Debug)]
pub struct PyScheduleMetrics {
    #[pyo3(get)]
    pub total_duration: i64,
    #[pyo3(get)]
    pub active_work_time: i64,
    #[pyo3(get)]
    pub async_parallel_time: i64,
    #[pyo3(get)]
    pub deadlines_met: usize,
    #[pyo3(get)]
    pub deadlines_missed: usize,
    #[pyo3(get)]
    pub avg_completion_time: f64,
    #[pyo3(get)]
    pub critical_path_length: i64,
}

impl From<&ScheduleMetrics> for PyScheduleMetrics {
    fn from(metrics: &ScheduleMetrics) -> Self {
        Self {
            total_duration: metrics.total_duration,
            active_work_time: metrics.active_work_time,
            async_parallel_time: metrics.async_parallel_time,
            deadlines_met: metrics.deadlines_met,
            deadlines_missed: metrics.deadlines_missed,
            avg_completion_time: metrics.avg_completion_time,
            critical_path_length: metrics.critical_path_length,
        }
    }
}

#[pyclass(name = "PatternBlock")]
#[derive(Clone, Debug)]
pub struct PyPatternBlock {
    #[pyo3(get)]
    pub id: String,
    #[pyo3(get)]
    pub start: NaiveTime,
    #[pyo3(get)]
    pub end: NaiveTime,
    #[pyo3(get)]
    pub item_ids: Vec<String>,
    #[pyo3(get)]
    pub total_minutes: i64,
}

#[pyclass(name = "WorkPattern")]
#[derive(Clone, Debug)]
pub struct PyWorkPattern {
    #[pyo3(get)]
    pub date: NaiveDate,
    #[pyo3(get)]
    pub blocks: Vec<PyPatternBlock>,
    /// (name, start, end) per meeting
    #[pyo3(get)]
    pub meetings: Vec<(String, NaiveTime, NaiveTime)>,
}

impl From<WorkPattern> for PyWorkPattern {
    fn from(pattern: WorkPattern) -> Self {
        Self {
            date: pattern.date,
            blocks: pattern
                .blocks
                .into_iter()
                .map(|b| PyPatternBlock {
                    id: b.id,
                    start: b.start,
                    end: b.end,
                    item_ids: b.item_ids,
                    total_minutes: b.total_minutes,
                })
                .collect(),
            meetings: pattern
                .meetings
                .into_iter()
                .map(|m| (m.name, m.start, m.end))
                .collect(),
        }
    }
}

#[pyclass(name = "OptimizationResult")]
#[derive(Clone, Debug)]
pub struct PyOptimizationResult {
    #[pyo3(get)]
    pub blocks: Vec<PyWorkBlock>,
    #[pyo3(get)]
    pub schedule: Vec<PyScheduledItem>,
    #[pyo3(get)]
    pub metrics: PyScheduleMetrics,
    #[pyo3(get)]
    pub warnings: Vec<String>,
    #[pyo3(get)]
    pub suggestions: Vec<String>,
    inner: OptimizationResult,
}

#[pymethods]
impl PyOptimizationResult {
    /// Per-day display projection of the work blocks.
    fn work_patterns(&self) -> Vec<PyWorkPattern> {
        optimal_schedule_to_work_patterns(&self.inner)
            .into_iter()
            .map(PyWorkPattern::from)
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "OptimizationResult(schedule={}, blocks={}, warnings={})",
            self.schedule.len(),
            self.blocks.len(),
            self.warnings.len()
        )
    }
}

impl From<OptimizationResult> for PyOptimizationResult {
    fn from(result: OptimizationResult) -> Self {
        Self {
            blocks: result.blocks.iter().map(PyWorkBlock::from).collect(),
            schedule: result.schedule.iter().map(PyScheduledItem::from).collect(),
            metrics: PyScheduleMetrics::from(&result.metrics),
            warnings: result.warnings.clone(),
            suggestions: result.suggestions.clone(),
            inner: result,
        }
    }
}

/// Generate a schedule for the given tasks and workflows.
///
/// # Raises
/// * ValueError for malformed configuration or input
#[pyfunction]
#[pyo3(name = "generate_optimal_schedule", signature = (tasks, workflows, start_time, config=None))]
fn py_generate_optimal_schedule(
    tasks: Vec<PyTask>,
    workflows: Vec<PySequencedTask>,
    start_time: NaiveDateTime,
    config: Option<PyOptimalScheduleConfig>,
) -> PyResult<PyOptimizationResult> {
    let tasks: Vec<Task> = tasks.iter().map(Task::from).collect();
    let workflows: Vec<SequencedTask> = workflows.iter().map(SequencedTask::from).collect();
    let config = config
        .as_ref()
        .map(OptimalScheduleConfig::from)
        .unwrap_or_default();

    match generate_optimal_schedule(&tasks, &workflows, start_time, &config) {
        Ok(result) => Ok(result.into()),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// The optimal_scheduler Python module.
#[pymodule]
fn optimal_scheduler(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Inputs
    m.add_class::<PyTask>()?;
    m.add_class::<PyTaskStep>()?;
    m.add_class::<PySequencedTask>()?;
    m.add_class::<PyMeeting>()?;
    m.add_class::<PyOptimalScheduleConfig>()?;

    // Results
    m.add_class::<PyScheduledItem>()?;
    m.add_class::<PyWorkBlock>()?;
    m.add_class::<PyScheduleMetrics>()?;
    m.add_class::<PyPatternBlock>()?;
    m.add_class::<PyWorkPattern>()?;
    m.add_class::<PyOptimizationResult>()?;

    m.add_function(wrap_pyfunction!(py_generate_optimal_schedule, m)?)?;

    Ok(())
}
