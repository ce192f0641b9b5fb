// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Shared error types.

use std::error::Error;
use std::fmt;

/// The error taxonomy for the simulation core.
///
/// `Configuration` and `InvariantViolation` are fatal: a caller should
/// abort setup/the cycle loop when it sees one. `AdmissionDenied` and
/// `PipelineFull` are recoverable per-call outcomes that user node logic is
/// expected to handle (retry next cycle, count a failure, etc).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Invalid or contradictory setup: bad CSV row, unresolvable node kind,
    /// duplicate id. Fatal at setup.
    Configuration(String),
    /// A core or user-node invariant was broken at run time (double send in
    /// a cycle, unregistered stat name, unknown port id). Fatal at run time.
    InvariantViolation(String),
    /// A send could not be admitted this cycle (no credit, or the
    /// underlying link pipeline was saturated). Recoverable.
    AdmissionDenied,
    /// A link pipeline was at capacity when a push was attempted.
    /// Recoverable; `OutputPort` folds this into `AdmissionDenied` before
    /// it reaches node logic (see `OutputPort::push_pkt`).
    PipelineFull,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            SimError::InvariantViolation(msg) => write!(f, "invariant violation: {msg}"),
            SimError::AdmissionDenied => write!(f, "admission denied"),
            SimError::PipelineFull => write!(f, "pipeline full"),
        }
    }
}

impl Error for SimError {}

/// The result type used throughout the simulation core.
pub type SimResult<T> = Result<T, SimError>;

#[macro_export]
/// Build a `SimError::Configuration` from a message that supports `to_string`.
macro_rules! configuration_error {
    ($($arg:tt)*) => {
        Err($crate::types::SimError::Configuration(format!($($arg)*)))
    };
}

#[macro_export]
/// Build a `SimError::InvariantViolation` from a message that supports `to_string`.
macro_rules! invariant_error {
    ($($arg:tt)*) => {
        Err($crate::types::SimError::InvariantViolation(format!($($arg)*)))
    };
}
