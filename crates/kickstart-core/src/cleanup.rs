//! Best-effort removal of the bootstrapper's own files.

use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    /// Already gone before we got to them.
    pub absent: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Delete every path. Errors are logged and recorded, never returned.
pub fn remove_all(paths: &[PathBuf]) -> CleanupReport {
    let mut report = CleanupReport::default();
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed");
                report.removed.push(path.clone());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                report.absent.push(path.clone());
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "could not remove: {e}");
                report.failed.push(path.clone());
            }
        }
    }
    report
}

/// The running executable, if it sits directly inside `root`. A template may
/// ship the binary next to its launcher scripts; it then goes with them.
pub fn current_exe_in(root: &Path) -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let exe_dir = exe.parent()?.canonicalize().ok()?;
    let root = root.canonicalize().ok()?;
    (exe_dir == root).then_some(exe)
}
