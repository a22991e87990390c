//! Bounded parallel dispatch
//!
//! Each executable gets its own task; a semaphore caps how many children
//! are alive at once. A slot is held from spawn until the child's exit has
//! been observed.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::aggregator::Aggregator;
use super::launcher::{launch_executable, Spawner};
use crate::error::{ChildError, DriverError};
use crate::models::ChildOutcome;
use crate::utils::Timer;

/// Children allowed to run at once unless configured otherwise
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Launches a batch of executables under a fixed concurrency ceiling
pub struct BoundedLauncher {
    max_concurrent: usize,
    spawner: Arc<dyn Spawner>,
}

impl BoundedLauncher {
    pub fn new(spawner: Arc<dyn Spawner>) -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            spawner,
        }
    }

    /// Set the ceiling; zero is raised to one
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Run every executable and wait for all of their outcomes
    ///
    /// Child failures land in their own outcome, including a launch that
    /// panics. There is no timeout:
    /// a child that never exits keeps this future pending.
    pub async fn dispatch(
        &self,
        executables: Vec<String>,
    ) -> Result<Vec<ChildOutcome>, DriverError> {
        info!(
            "Dispatching {} executables (max {} concurrent)",
            executables.len(),
            self.max_concurrent
        );

        let timer = Timer::start("batch dispatch");
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let (tx, aggregator) = Aggregator::channel(executables.len());

        for executable in executables {
            let semaphore = semaphore.clone();
            let spawner = self.spawner.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let outcome = match semaphore.acquire().await {
                    Ok(permit) => {
                        let name = executable.clone();
                        let launch = tokio::spawn(async move {
                            launch_executable(spawner.as_ref(), &name).await
                        });
                        let outcome = launch.await.unwrap_or_else(|e| {
                            warn!("Launch of {} did not finish: {}", executable, e);
                            ChildOutcome::failed(
                                executable.clone(),
                                ChildError::other("launch task panicked"),
                            )
                        });
                        drop(permit);
                        outcome
                    }
                    Err(_) => ChildOutcome::failed(executable, ChildError::SlotUnavailable),
                };

                if let Err(e) = tx.send(outcome) {
                    warn!("Outcome for {} dropped: aggregator gone", e.0.executable);
                }
            });
        }

        // Only the launch tasks hold senders from here on
        drop(tx);

        let results = aggregator.collect().await?;
        let failed = results.iter().filter(|r| !r.is_success()).count();

        debug!("{} of {} executables failed", failed, results.len());
        info!(
            "Batch completed in {}ms ({} outcomes)",
            timer.stop().as_millis(),
            results.len()
        );

        Ok(results)
    }
}
