// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Scope-filtered trace output used by the simulation engine.
//!
//! A [`Tracker`] is built once (typically by a CLI front end from
//! `--log-level`/`--log-scope` flags) and threaded explicitly through the
//! engine to every node, in the same spirit as the heavier entity/tracker
//! hierarchy this crate was distilled from: no process-wide logger, no
//! global mutable state.
//!
//! Filtering has two independent axes: a [`Level`] threshold, and a scope
//! allow-list. A record is emitted only if its level is at or above the
//! configured threshold AND its scope is either in the allow-list or the
//! allow-list is the wildcard `all`.

use std::fmt;

pub mod scope;

pub use scope::Scopes;

/// Trace/log severity, ordered from most to least verbose.
///
/// `Off` is a sentinel: no record is ever emitted at that level, and
/// configuring the tracker with `Off` as its threshold disables all output
/// (mirroring `logging.disable(CRITICAL)` in the reference backend).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warning,
    Info,
    Debug,
    Off,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Off => "OFF",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARNING" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "OFF" => Ok(Level::Off),
            other => Err(format!("unrecognised log level '{other}'")),
        }
    }
}

fn to_log_level(level: Level) -> Option<log::Level> {
    match level {
        Level::Error => Some(log::Level::Error),
        Level::Warning => Some(log::Level::Warn),
        Level::Info => Some(log::Level::Info),
        Level::Debug => Some(log::Level::Debug),
        Level::Off => None,
    }
}

/// A scope-filtered, level-thresholded trace sink.
///
/// Cloning is cheap (the scope list is reference counted) so a `Tracker`
/// can be copied into every node without the engine needing to hand out
/// borrows.
#[derive(Debug, Clone)]
pub struct Tracker {
    threshold: Level,
    scopes: Scopes,
}

impl Tracker {
    /// Build a tracker from a level threshold and a comma-separated scope
    /// list (or the literal `all`), exactly as accepted on the CLI.
    #[must_use]
    pub fn new(threshold: Level, scopes: Scopes) -> Self {
        Self { threshold, scopes }
    }

    /// A tracker that discards everything; useful in tests that don't care
    /// about log output.
    #[must_use]
    pub fn off() -> Self {
        Self::new(Level::Off, Scopes::all())
    }

    fn enabled(&self, scope: &str, level: Level) -> bool {
        if self.threshold == Level::Off || level > self.threshold {
            return false;
        }
        self.scopes.allows(scope)
    }

    /// Emit a record if `scope`/`level` pass the configured filter.
    ///
    /// `cycle` is included in the record when the caller is inside the
    /// simulation's cycle loop; top-level setup/teardown messages pass
    /// `None`.
    pub fn log(&self, scope: &str, level: Level, cycle: Option<u64>, args: fmt::Arguments<'_>) {
        if !self.enabled(scope, level) {
            return;
        }
        let Some(log_level) = to_log_level(level) else {
            return;
        };
        match cycle {
            Some(c) => log::log!(target: "netfab", log_level, "[cycle {c}] {scope}: {args}"),
            None => log::log!(target: "netfab", log_level, "{scope}: {args}"),
        }
    }
}

/// Log a record through a [`Tracker`], at a named scope, optionally tagged
/// with the current cycle.
///
/// ```ignore
/// trace!(tracker, Level::Debug, "link", Some(cycle); "delivered {} bytes", n);
/// trace!(tracker, Level::Info, "node", None; "setup complete");
/// ```
#[macro_export]
macro_rules! trace {
    ($tracker:expr, $level:expr, $scope:expr, $cycle:expr ; $($arg:tt)*) => {
        $tracker.log($scope, $level, $cycle, format_args!($($arg)*))
    };
}
