//! Error types
//!
//! `DriverError` covers failures of the batch as a whole; `ChildError` is the
//! terminal error of a single dispatched executable and never escapes its
//! `ChildOutcome`.

use std::io;
use thiserror::Error;

/// Batch-level errors
#[derive(Error, Debug)]
pub enum DriverError {
    /// Filesystem lookup failure, passed through untouched
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Directory expected")]
    DirectoryExpected,

    #[error("Not allowed while the driver is {0}")]
    InvalidState(String),

    #[error("Cannot translate to JSON: {record} (reason: {source})")]
    Serialization {
        record: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Completion channel closed after {received} of {expected} outcomes")]
    Incomplete { expected: usize, received: usize },
}

/// Per-child terminal errors
#[derive(Error, Debug)]
pub enum ChildError {
    #[error("failed to start: {0}")]
    Spawn(#[source] io::Error),

    #[error("{0} stream unavailable")]
    StreamUnavailable(&'static str),

    #[error("wait failed: {0}")]
    Wait(#[source] io::Error),

    #[error("exit status {0}")]
    Exit(i32),

    #[error("signal: {}", signal_name(*.0))]
    Signal(i32),

    #[error("concurrency slot unavailable")]
    SlotUnavailable,

    #[error("{0}")]
    Other(String),
}

impl ChildError {
    /// Build a free-form error, typically from an injected spawner
    pub fn other(msg: impl Into<String>) -> Self {
        ChildError::Other(msg.into())
    }

    /// Classify a non-successful exit status
    pub fn from_status(status: std::process::ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ChildError::Exit(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ChildError::Signal(signal);
            }
        }

        ChildError::Other(format!("abnormal termination: {status}"))
    }
}

/// Describe a signal the way `strsignal` does, for the portable numbers
fn signal_name(signal: i32) -> String {
    let name = match signal {
        1 => "hangup",
        2 => "interrupt",
        3 => "quit",
        4 => "illegal instruction",
        5 => "trace/breakpoint trap",
        6 => "aborted",
        8 => "floating point exception",
        9 => "killed",
        11 => "segmentation fault",
        13 => "broken pipe",
        14 => "alarm clock",
        15 => "terminated",
        other => return format!("signal {other}"),
    };
    name.to_string()
}
