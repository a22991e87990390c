//! Child process outcomes

use std::fmt;

use crate::error::ChildError;

/// Terminal result of one dispatched executable
///
/// Output is kept as the chunks read off each pipe; only their
/// concatenation is meaningful.
#[derive(Debug)]
pub struct ChildOutcome {
    pub executable: String,
    pub error: Option<ChildError>,
    pub stdout: Vec<Vec<u8>>,
    pub stderr: Vec<Vec<u8>>,
}

impl ChildOutcome {
    pub fn success(
        executable: impl Into<String>,
        stdout: Vec<Vec<u8>>,
        stderr: Vec<Vec<u8>>,
    ) -> Self {
        Self {
            executable: executable.into(),
            error: None,
            stdout,
            stderr,
        }
    }

    /// Outcome for a child that failed before producing any output
    pub fn failed(executable: impl Into<String>, error: ChildError) -> Self {
        Self {
            executable: executable.into(),
            error: Some(error),
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Captured stdout, decoded lossily
    pub fn stdout_text(&self) -> String {
        join_chunks(&self.stdout)
    }

    /// Captured stderr, decoded lossily
    pub fn stderr_text(&self) -> String {
        join_chunks(&self.stderr)
    }
}

impl fmt::Display for ChildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(f, "{}: ok", self.executable),
            Some(e) => write!(f, "{}: {}", self.executable, e),
        }
    }
}

fn join_chunks(chunks: &[Vec<u8>]) -> String {
    String::from_utf8_lossy(&chunks.concat()).into_owned()
}
