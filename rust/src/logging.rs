//! Verbosity-gated logging for the scheduling loop.
//!
//! Messages go to stderr and cost nothing at verbosity 0. Levels:
//! - 0: SILENT
//! - 1: CHANGES (commits, breaks, conflict skips, time jumps)
//! - 2: CHECKS (each candidate considered)
//! - 3: DEBUG (critical paths and candidate order)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            eprintln!("[scheduler] {}", format_args!($($arg)*));
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!("[scheduler] {}", format_args!($($arg)*));
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!("[scheduler] {}", format_args!($($arg)*));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimalScheduleConfig;

    #[test]
    fn test_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_CHANGES);
        assert!(VERBOSITY_CHANGES < VERBOSITY_CHECKS);
        assert!(VERBOSITY_CHECKS < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_default_config_is_silent() {
        let verbosity = OptimalScheduleConfig::default().verbosity;
        assert_eq!(verbosity, VERBOSITY_SILENT);
        log_changes!(verbosity, "committed {}", "a");
        log_checks!(verbosity, "considering {}", "b");
        log_debug!(verbosity, "order {:?}", ["a", "b"]);
    }
}
