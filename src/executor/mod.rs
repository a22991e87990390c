//! Dispatch engine
//!
//! Launches discovered executables as child processes under a concurrency
//! ceiling and gathers one outcome per executable.

mod aggregator;
mod launcher;
mod parallel;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{Aggregator, CompletionSender};
pub use launcher::{
    drain, launch_executable, ByteStream, ExitFuture, ProcessSpawner, SpawnedChild, Spawner,
    READ_CHUNK_SIZE,
};
pub use parallel::{BoundedLauncher, DEFAULT_MAX_CONCURRENT};
