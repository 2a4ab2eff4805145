//! Logging macros for the staffing engine with verbosity level control.
//!
//! Output goes to stderr and costs nothing when verbosity is 0.
//! Levels:
//! - 0: SILENT
//! - 1: RESULTS (final headcounts, per-interval plans)
//! - 2: SEARCH (solver bracket and bisection steps)
//! - 3: DEBUG (Erlang A iterations)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_RESULTS: u8 = 1;
pub const VERBOSITY_SEARCH: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at RESULTS level (verbosity >= 1).
#[macro_export]
macro_rules! log_results {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_RESULTS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at SEARCH level (verbosity >= 2).
///
/// Used for: bracket doubling, bisection probes, structural infeasibility.
#[macro_export]
macro_rules! log_search {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_SEARCH {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}
