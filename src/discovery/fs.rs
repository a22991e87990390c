//! Filesystem lookups used by discovery
//!
//! Discovery only needs two queries: a status lookup on the batch root and a
//! directory listing. Both go through `FileSystem` so tests can describe a
//! tree without touching disk.

use std::fs;
use std::io;
use std::path::Path;

/// User-or-group execute permission bits
pub const EXECUTE_MASK: u32 = 0o110;

/// Attributes of a single filesystem entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryInfo {
    /// Final path component
    pub name: String,
    pub is_dir: bool,
    /// Permission bits (`st_mode & 0o7777`)
    pub mode: u32,
}

impl EntryInfo {
    pub fn file(name: impl Into<String>, mode: u32) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
            mode,
        }
    }

    pub fn dir(name: impl Into<String>, mode: u32) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
            mode,
        }
    }

    pub fn is_executable(&self) -> bool {
        self.mode & EXECUTE_MASK != 0
    }

    fn from_metadata(name: String, meta: &fs::Metadata) -> Self {
        Self {
            name,
            is_dir: meta.is_dir(),
            mode: permission_bits(meta),
        }
    }
}

#[cfg(unix)]
fn permission_bits(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(meta: &fs::Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

/// Status and listing queries consulted during discovery
pub trait FileSystem: Send + Sync {
    /// Status of `path`, following symlinks
    fn stat(&self, path: &str) -> io::Result<EntryInfo>;

    /// Children of the directory at `path`
    fn read_dir(&self, path: &str) -> io::Result<Vec<EntryInfo>>;
}

/// `FileSystem` backed by the host OS
///
/// Listings use `lstat` semantics and come back sorted by name, so a
/// symlinked directory is reported as a plain entry and never recursed into.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn stat(&self, path: &str) -> io::Result<EntryInfo> {
        let meta = fs::metadata(path)?;
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        Ok(EntryInfo::from_metadata(name, &meta))
    }

    fn read_dir(&self, path: &str) -> io::Result<Vec<EntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let meta = fs::symlink_metadata(entry.path())?;
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(EntryInfo::from_metadata(name, &meta));
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_execute_mask() {
        assert!(EntryInfo::file("a", 0o755).is_executable());
        assert!(EntryInfo::file("a", 0o010).is_executable());
        assert!(EntryInfo::file("a", 0o100).is_executable());
        assert!(!EntryInfo::file("a", 0o644).is_executable());
        // Other-execute alone does not qualify
        assert!(!EntryInfo::file("a", 0o001).is_executable());
    }

    #[test]
    fn test_local_stat_missing() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = LocalFs.stat(missing.to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_local_read_dir_sorted_with_modes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let b = dir.path().join("b");
        let a = dir.path().join("a");
        fs::write(&b, "x").unwrap();
        fs::write(&a, "x").unwrap();
        fs::set_permissions(&b, fs::Permissions::from_mode(0o755)).unwrap();
        fs::set_permissions(&a, fs::Permissions::from_mode(0o644)).unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();

        let entries = LocalFs.read_dir(dir.path().to_str().unwrap()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(!entries[0].is_executable());
        assert!(entries[1].is_executable());
        assert!(entries[2].is_dir);
    }
}
