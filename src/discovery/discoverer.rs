//! Recursive executable discovery

use tracing::{debug, trace};

use super::fs::FileSystem;
use crate::error::DriverError;

/// Depth-first walker producing qualified executable paths
pub struct Discoverer<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> Discoverer<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Collect every executable under `root`
    ///
    /// Paths are `/`-joined onto `root` as given, in listing order. Returns
    /// `DirectoryExpected` if `root` exists but is not a directory; any
    /// lookup failure is returned verbatim.
    pub fn discover(&self, root: &str) -> Result<Vec<String>, DriverError> {
        let info = self.fs.stat(root)?;
        if !info.is_dir {
            return Err(DriverError::DirectoryExpected);
        }

        let mut executables = Vec::new();
        self.walk(root, &mut executables)?;

        debug!("Discovered {} executables under {}", executables.len(), root);
        Ok(executables)
    }

    fn walk(&self, dir: &str, out: &mut Vec<String>) -> Result<(), DriverError> {
        for entry in self.fs.read_dir(dir)? {
            let qualified = format!("{dir}/{}", entry.name);
            if entry.is_executable() {
                trace!("Qualified {}", qualified);
                out.push(qualified.clone());
            }
            if entry.is_dir {
                self.walk(&qualified, out)?;
            }
        }
        Ok(())
    }
}
