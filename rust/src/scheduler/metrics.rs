//! Schedule metrics and deadline reporting.

use rustc_hash::FxHashMap;

use crate::critical_path::critical_path_length;
use crate::models::{ScheduleMetrics, ScheduledItem};

/// Aggregate a finished schedule.
///
/// Returns the metrics plus one warning per missed deadline.
pub fn compute_metrics(
    schedule: &[ScheduledItem],
    critical_paths: &FxHashMap<String, i64>,
) -> (ScheduleMetrics, Vec<String>) {
    let mut warnings = Vec::new();
    let mut active_work_time = 0;
    let mut async_parallel_time = 0;
    let mut deadlines_met = 0;
    let mut deadlines_missed = 0;

    for entry in schedule {
        if entry.item.kind.is_async_wait() {
            async_parallel_time += entry.item.duration;
            continue;
        }
        active_work_time += entry.item.duration;

        let Some(deadline) = entry.item.deadline else {
            continue;
        };
        if entry.end_time <= deadline {
            deadlines_met += 1;
        } else {
            deadlines_missed += 1;
            let overage_secs = (entry.end_time - deadline).num_seconds();
            let overage_minutes = (overage_secs + 59) / 60;
            warnings.push(format!(
                "{} will miss its deadline by {} minutes",
                entry.item.name, overage_minutes
            ));
        }
    }

    let total_duration = match schedule.first() {
        Some(first) => schedule
            .iter()
            .map(|s| s.end_time)
            .max()
            .map(|last_end| (last_end - first.start_time).num_minutes())
            .unwrap_or(0),
        None => 0,
    };

    // Divides by every entry, async-wait rows included
    let avg_completion_time = if schedule.is_empty() {
        0.0
    } else {
        active_work_time as f64 / schedule.len() as f64
    };

    let metrics = ScheduleMetrics {
        total_duration,
        active_work_time,
        async_parallel_time,
        deadlines_met,
        deadlines_missed,
        avg_completion_time,
        critical_path_length: critical_path_length(critical_paths),
    };

    (metrics, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WorkItem, WorkItemKind, DEFAULT_PRIORITY};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 8)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn entry(
        id: &str,
        kind: WorkItemKind,
        start: NaiveDateTime,
        minutes: i64,
        deadline: Option<NaiveDateTime>,
    ) -> ScheduledItem {
        ScheduledItem {
            item: WorkItem {
                id: id.to_string(),
                name: id.to_string(),
                kind,
                duration: minutes,
                priority: DEFAULT_PRIORITY,
                deadline,
                dependencies: vec![],
                async_wait: None,
                critical_path: minutes,
                cognitive_complexity: None,
            },
            start_time: start,
            end_time: start + chrono::Duration::minutes(minutes),
        }
    }

    #[test]
    fn test_empty_schedule() {
        let (metrics, warnings) = compute_metrics(&[], &FxHashMap::default());
        assert_eq!(metrics, ScheduleMetrics::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_work_and_async_time_split() {
        let schedule = vec![
            entry("deploy", WorkItemKind::Task, at(9, 0), 30, None),
            entry(
                "deploy-wait",
                WorkItemKind::AsyncWait {
                    trigger_id: "deploy".to_string(),
                },
                at(9, 30),
                120,
                None,
            ),
            entry("docs", WorkItemKind::Task, at(9, 30), 60, None),
        ];
        let mut paths = FxHashMap::default();
        paths.insert("deploy".to_string(), 30);
        paths.insert("docs".to_string(), 60);

        let (metrics, _) = compute_metrics(&schedule, &paths);
        assert_eq!(metrics.active_work_time, 90);
        assert_eq!(metrics.async_parallel_time, 120);
        // 09:00 to the wait ending at 11:30
        assert_eq!(metrics.total_duration, 150);
        assert!((metrics.avg_completion_time - 30.0).abs() < 1e-9);
        assert_eq!(metrics.critical_path_length, 60);
    }

    #[test]
    fn test_deadline_counts_and_warning() {
        let schedule = vec![
            entry("on_time", WorkItemKind::Task, at(9, 0), 60, Some(at(10, 0))),
            entry("late", WorkItemKind::Task, at(10, 0), 60, Some(at(10, 45))),
        ];
        let (metrics, warnings) = compute_metrics(&schedule, &FxHashMap::default());
        assert_eq!(metrics.deadlines_met, 1);
        assert_eq!(metrics.deadlines_missed, 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("late"));
        assert!(warnings[0].contains("15 minutes"));
    }
}
