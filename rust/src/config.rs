//! Configuration for the optimal scheduler.

use chrono::NaiveTime;
use thiserror::Error;

use crate::conflicts::SleepWindow;
use crate::models::Meeting;

/// Errors raised for malformed configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid clock time for {field}: {value:?} (expected HH:MM)")]
    InvalidClockTime { field: &'static str, value: String },
    #[error("max_continuous_work must be positive, got {0}")]
    NonPositiveMaxContinuousWork(i64),
    #[error("preferred_break_duration must not be negative, got {0}")]
    NegativeBreakDuration(i64),
    #[error("Meeting {0} ends before it starts")]
    InvertedMeeting(String),
}

/// Sleep, meeting and break settings for one scheduling run.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimalScheduleConfig {
    /// Clock time when the sleep window begins, "HH:MM".
    pub sleep_start: String,
    /// Clock time when the sleep window ends, "HH:MM".
    pub sleep_end: String,
    pub meetings: Vec<Meeting>,
    /// Informational only; breaks are driven by `max_continuous_work`.
    pub preferred_break_interval: i64,
    /// Minutes of rest inserted once the continuous-work threshold is hit.
    pub preferred_break_duration: i64,
    /// Minutes of uninterrupted work before a break is forced.
    pub max_continuous_work: i64,
    /// Loop guard; `None` derives a bound from the input size.
    pub max_iterations: Option<usize>,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
}

impl Default for OptimalScheduleConfig {
    fn default() -> Self {
        Self {
            sleep_start: "23:00".to_string(),
            sleep_end: "07:00".to_string(),
            meetings: Vec::new(),
            preferred_break_interval: 90,
            preferred_break_duration: 15,
            max_continuous_work: 180,
            max_iterations: None,
            verbosity: 0,
        }
    }
}

impl OptimalScheduleConfig {
    pub fn with_sleep(mut self, start: &str, end: &str) -> Self {
        self.sleep_start = start.to_string();
        self.sleep_end = end.to_string();
        self
    }

    pub fn with_meetings(mut self, meetings: Vec<Meeting>) -> Self {
        self.meetings = meetings;
        self
    }

    pub fn with_breaks(mut self, max_continuous_work: i64, break_duration: i64) -> Self {
        self.max_continuous_work = max_continuous_work;
        self.preferred_break_duration = break_duration;
        self
    }

    /// Parse the sleep clock times.
    pub fn sleep_window(&self) -> Result<SleepWindow, ConfigError> {
        Ok(SleepWindow::new(
            parse_clock_time("sleep_start", &self.sleep_start)?,
            parse_clock_time("sleep_end", &self.sleep_end)?,
        ))
    }

    /// Validate every field and return the parsed sleep window.
    pub fn validate(&self) -> Result<SleepWindow, ConfigError> {
        if self.max_continuous_work <= 0 {
            return Err(ConfigError::NonPositiveMaxContinuousWork(
                self.max_continuous_work,
            ));
        }
        if self.preferred_break_duration < 0 {
            return Err(ConfigError::NegativeBreakDuration(
                self.preferred_break_duration,
            ));
        }
        if let Some(meeting) = self.meetings.iter().find(|m| m.end < m.start) {
            return Err(ConfigError::InvertedMeeting(meeting.id.clone()));
        }
        self.sleep_window()
    }
}

/// Parse an "HH:MM" clock time.
pub fn parse_clock_time(field: &'static str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ConfigError::InvalidClockTime {
        field,
        value: value.to_string(),
    })
}
