use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Intermediate files created during a run, removed when the run ends
///
/// Paths are registered before anything is written to them, so a failure
/// half way through a write still gets cleaned up. Release also happens on
/// drop.
#[derive(Debug, Default)]
pub struct ResourceScope {
    tracked: Vec<PathBuf>,
}

impl ResourceScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track<P: AsRef<Path>>(&mut self, path: P) {
        self.tracked.push(path.as_ref().to_path_buf());
    }

    pub fn tracked(&self) -> &[PathBuf] {
        &self.tracked
    }

    /// Delete every tracked file; missing files are fine, errors are only logged
    pub fn release(&mut self) {
        for path in self.tracked.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Could not remove {}: {}", path.display(), e),
            }
        }
    }
}

impl Drop for ResourceScope {
    fn drop(&mut self) {
        self.release();
    }
}
