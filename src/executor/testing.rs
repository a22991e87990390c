//! Spawner stubs shared by executor and driver tests

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::launcher::{SpawnedChild, Spawner};
use crate::error::ChildError;

/// Fails the named executables at spawn time; every other one prints
/// `stdout here` and exits cleanly.
pub(crate) struct ScriptedSpawner {
    failing: HashSet<String>,
    pub(crate) spawned: Mutex<Vec<String>>,
}

impl ScriptedSpawner {
    pub(crate) fn failing(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            spawned: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn spawned(&self) -> Vec<String> {
        self.spawned.lock().unwrap().clone()
    }
}

impl Spawner for ScriptedSpawner {
    fn spawn(&self, executable: &str) -> Result<SpawnedChild, ChildError> {
        self.spawned.lock().unwrap().push(executable.to_string());
        if self.failing.contains(executable) {
            return Err(ChildError::other("synthetic failure"));
        }
        Ok(SpawnedChild::new(
            &b"stdout here"[..],
            tokio::io::empty(),
            async { Ok(()) },
        ))
    }
}

/// Tracks how many children are alive at once
#[derive(Default)]
pub(crate) struct CountingSpawner {
    pub(crate) running: Arc<AtomicUsize>,
    pub(crate) peak: Arc<AtomicUsize>,
}

impl Spawner for CountingSpawner {
    fn spawn(&self, _: &str) -> Result<SpawnedChild, ChildError> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let running = self.running.clone();
        Ok(SpawnedChild::new(
            tokio::io::empty(),
            tokio::io::empty(),
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            },
        ))
    }
}

/// Children that never exit
pub(crate) struct HangingSpawner;

impl Spawner for HangingSpawner {
    fn spawn(&self, _: &str) -> Result<SpawnedChild, ChildError> {
        Ok(SpawnedChild::new(
            tokio::io::empty(),
            tokio::io::empty(),
            futures::future::pending(),
        ))
    }
}

/// Panics while spawning one executable; every other one prints `ok`
pub(crate) struct PanickingSpawner {
    target: String,
}

impl PanickingSpawner {
    pub(crate) fn on(target: &str) -> Self {
        Self {
            target: target.to_string(),
        }
    }
}

impl Spawner for PanickingSpawner {
    fn spawn(&self, executable: &str) -> Result<SpawnedChild, ChildError> {
        if executable == self.target {
            panic!("spawner blew up on {executable}");
        }
        Ok(SpawnedChild::new(&b"ok"[..], tokio::io::empty(), async { Ok(()) }))
    }
}
