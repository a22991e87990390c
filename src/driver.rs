//! Batch driver
//!
//! Ties discovery, bounded dispatch and formatting together:
//! `Idle -> BatchLoaded -> Dispatching -> Completed`.

use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::discovery::{Discoverer, FileSystem, LocalFs};
use crate::error::DriverError;
use crate::executor::{BoundedLauncher, ProcessSpawner, Spawner, DEFAULT_MAX_CONCURRENT};
use crate::models::ChildOutcome;
use crate::output::{EventFormatter, OutputFormat, DEFAULT_SOURCE};

/// Lifecycle of a driver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    BatchLoaded,
    Dispatching,
    Completed,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverState::Idle => "idle",
            DriverState::BatchLoaded => "batch loaded",
            DriverState::Dispatching => "dispatching",
            DriverState::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Runs one batch of test executables
pub struct Driver {
    fs: Box<dyn FileSystem>,
    spawner: Arc<dyn Spawner>,
    max_concurrent: usize,
    source: String,
    state: DriverState,
    pending: Vec<String>,
    results: Vec<ChildOutcome>,
}

impl Driver {
    /// Driver backed by the host filesystem and real processes
    pub fn new() -> Self {
        Self {
            fs: Box::new(LocalFs),
            spawner: Arc::new(ProcessSpawner),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            source: DEFAULT_SOURCE.to_string(),
            state: DriverState::Idle,
            pending: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn with_filesystem(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Box::new(fs);
        self
    }

    pub fn with_spawner(mut self, spawner: Arc<dyn Spawner>) -> Self {
        self.spawner = spawner;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Label written to each event's `@source`
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Load the batch rooted at `path`
    ///
    /// Returns `DirectoryExpected` if `path` exists but isn't a directory;
    /// lower-level errors come back verbatim. On failure the driver keeps
    /// its previous batch and state.
    pub fn use_batch(&mut self, path: &str) -> Result<(), DriverError> {
        if self.state == DriverState::Dispatching {
            return Err(DriverError::InvalidState(self.state.to_string()));
        }

        let executables = Discoverer::new(self.fs.as_ref()).discover(path)?;
        info!("Loaded batch {} ({} executables)", path, executables.len());

        self.pending = executables;
        self.results.clear();
        self.state = DriverState::BatchLoaded;
        Ok(())
    }

    /// Pending executables, relative to the batch directory's parent
    ///
    /// For executables `A` and `B` inside batch `T` this yields `T/A`, `T/B`.
    pub fn executables(&self) -> &[String] {
        &self.pending
    }

    /// Dequeue the next pending executable, if any remain
    pub fn next_executable(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }

    /// Run every pending executable and collect their outcomes
    ///
    /// Individual failures are recorded in `results()`; they never fail
    /// this call.
    pub async fn launch_suites(&mut self) -> Result<(), DriverError> {
        if self.state != DriverState::BatchLoaded {
            return Err(DriverError::InvalidState(self.state.to_string()));
        }

        let batch = std::mem::take(&mut self.pending);
        let launcher =
            BoundedLauncher::new(self.spawner.clone()).with_max_concurrent(self.max_concurrent);

        self.state = DriverState::Dispatching;
        let dispatched = launcher.dispatch(batch).await;
        self.state = DriverState::Completed;
        self.results = dispatched?;
        Ok(())
    }

    /// Collected outcomes, in completion order
    pub fn results(&self) -> &[ChildOutcome] {
        &self.results
    }

    /// One JSON event line per collected outcome
    pub fn json_events(&self) -> Result<Vec<String>, DriverError> {
        self.formatter(OutputFormat::Json).json_events(&self.results)
    }

    /// Formatter carrying this driver's `@source` label
    pub fn formatter(&self, format: OutputFormat) -> EventFormatter {
        EventFormatter::new(format).with_source(self.source.clone())
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}
