//! In-memory filesystem
//!
//! Describes a directory tree as plain listings so discovery can be driven
//! without a real disk.

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

use super::fs::{EntryInfo, FileSystem};

/// Map-backed `FileSystem` that records every directory listed
#[derive(Debug, Default)]
pub struct MemoryFs {
    dirs: HashMap<String, Vec<EntryInfo>>,
    files: HashMap<String, EntryInfo>,
    visits: Mutex<Vec<String>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory and its listing, in listing order
    pub fn with_dir(mut self, path: impl Into<String>, entries: Vec<EntryInfo>) -> Self {
        self.dirs.insert(path.into(), entries);
        self
    }

    /// Register a non-directory path for `stat`
    pub fn with_file(mut self, path: impl Into<String>, mode: u32) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        self.files.insert(path, EntryInfo::file(name, mode));
        self
    }

    /// Directories listed so far, in visit order
    pub fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

impl FileSystem for MemoryFs {
    fn stat(&self, path: &str) -> io::Result<EntryInfo> {
        if self.dirs.contains_key(path) {
            let name = path.rsplit('/').next().unwrap_or(path);
            return Ok(EntryInfo::dir(name, 0o755));
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<EntryInfo>> {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(path.to_string());
        }
        self.dirs.get(path).cloned().ok_or_else(|| not_found(path))
    }
}

fn not_found(path: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("stat {path}: no such file or directory"),
    )
}
