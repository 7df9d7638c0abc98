//! Sleep-window and meeting conflict detection.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::models::Meeting;

/// Daily sleep window given as clock times.
///
/// When `end < start` the window crosses midnight (e.g. 23:00-07:00).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SleepWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SleepWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end < self.start
    }

    /// If `at` falls inside the window, the instant the window ends.
    ///
    /// Only the time of day of `at` is probed.
    pub fn resume_time(&self, at: NaiveDateTime) -> Option<NaiveDateTime> {
        let time = at.time();
        let today_end = at.date().and_time(self.end);

        if self.crosses_midnight() {
            if time >= self.start {
                Some(today_end + Duration::days(1))
            } else if time < self.end {
                Some(today_end)
            } else {
                None
            }
        } else if time >= self.start && time < self.end {
            Some(today_end)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    Sleep,
    Meeting,
}

/// First conflict found for a candidate interval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    pub kind: ConflictKind,
    /// Earliest instant at which scheduling may resume.
    pub resume_at: NaiveDateTime,
    /// Meeting name, for meeting conflicts.
    pub label: Option<String>,
}

/// Probes candidate intervals against the sleep window and meetings.
#[derive(Clone, Debug)]
pub struct ConflictDetector<'a> {
    sleep: SleepWindow,
    meetings: &'a [Meeting],
}

impl<'a> ConflictDetector<'a> {
    pub fn new(sleep: SleepWindow, meetings: &'a [Meeting]) -> Self {
        Self { sleep, meetings }
    }

    /// Check `[start, end)` and return the first conflict, sleep before meetings.
    pub fn check(&self, start: NaiveDateTime, end: NaiveDateTime) -> Option<Conflict> {
        if let Some(resume_at) = self.sleep.resume_time(start) {
            return Some(Conflict {
                kind: ConflictKind::Sleep,
                resume_at,
                label: None,
            });
        }

        self.meetings
            .iter()
            .find(|m| !(end <= m.start || start >= m.end))
            .map(|m| Conflict {
                kind: ConflictKind::Meeting,
                resume_at: m.end,
                label: Some(m.name.clone()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn clock(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn overnight() -> SleepWindow {
        SleepWindow::new(clock(23, 0), clock(7, 0))
    }

    #[test]
    fn test_overnight_window_before_midnight_resumes_tomorrow() {
        let window = overnight();
        assert!(window.crosses_midnight());
        assert_eq!(window.resume_time(at(8, 23, 0)), Some(at(9, 7, 0)));
        assert_eq!(window.resume_time(at(8, 23, 59)), Some(at(9, 7, 0)));
    }

    #[test]
    fn test_overnight_window_after_midnight_resumes_today() {
        let window = overnight();
        assert_eq!(window.resume_time(at(9, 0, 0)), Some(at(9, 7, 0)));
        assert_eq!(window.resume_time(at(9, 6, 59)), Some(at(9, 7, 0)));
    }

    #[test]
    fn test_overnight_window_daytime_is_free() {
        let window = overnight();
        assert_eq!(window.resume_time(at(9, 7, 0)), None);
        assert_eq!(window.resume_time(at(9, 12, 0)), None);
        assert_eq!(window.resume_time(at(9, 22, 59)), None);
    }

    #[test]
    fn test_same_day_window() {
        let window = SleepWindow::new(clock(1, 0), clock(7, 0));
        assert!(!window.crosses_midnight());
        assert_eq!(window.resume_time(at(9, 0, 30)), None);
        assert_eq!(window.resume_time(at(9, 1, 0)), Some(at(9, 7, 0)));
        assert_eq!(window.resume_time(at(9, 6, 30)), Some(at(9, 7, 0)));
        assert_eq!(window.resume_time(at(9, 7, 0)), None);
        assert_eq!(window.resume_time(at(9, 23, 30)), None);
    }

    #[test]
    fn test_meeting_overlap() {
        let meetings = vec![Meeting::new("m1", "Standup", at(8, 10, 0), at(8, 10, 30))];
        let detector = ConflictDetector::new(overnight(), &meetings);

        let conflict = detector.check(at(8, 9, 30), at(8, 10, 15)).unwrap();
        assert_eq!(conflict.kind, ConflictKind::Meeting);
        assert_eq!(conflict.resume_at, at(8, 10, 30));
        assert_eq!(conflict.label.as_deref(), Some("Standup"));

        // Touching boundaries do not overlap
        assert!(detector.check(at(8, 9, 0), at(8, 10, 0)).is_none());
        assert!(detector.check(at(8, 10, 30), at(8, 11, 0)).is_none());
    }

    #[test]
    fn test_sleep_checked_before_meetings() {
        let meetings = vec![Meeting::new("m1", "Late call", at(8, 23, 0), at(8, 23, 30))];
        let detector = ConflictDetector::new(overnight(), &meetings);

        let conflict = detector.check(at(8, 23, 0), at(8, 23, 45)).unwrap();
        assert_eq!(conflict.kind, ConflictKind::Sleep);
        assert_eq!(conflict.resume_at, at(9, 7, 0));
    }

    #[test]
    fn test_first_overlapping_meeting_wins() {
        let meetings = vec![
            Meeting::new("a", "First", at(8, 10, 0), at(8, 11, 0)),
            Meeting::new("b", "Second", at(8, 10, 30), at(8, 12, 0)),
        ];
        let detector = ConflictDetector::new(overnight(), &meetings);

        let conflict = detector.check(at(8, 10, 45), at(8, 11, 15)).unwrap();
        assert_eq!(conflict.resume_at, at(8, 11, 0));
    }
}
