//! Batch discovery
//!
//! Walks a batch directory and collects every entry carrying an execute bit.

mod discoverer;
mod fs;
mod memory;

pub use discoverer::Discoverer;
pub use fs::{EntryInfo, FileSystem, LocalFs, EXECUTE_MASK};
pub use memory::MemoryFs;
