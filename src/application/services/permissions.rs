//! Post-save permission sync
//!
//! Marks every registered alias target executable so it can be launched
//! directly. Best-effort: missing targets are skipped and failures are only
//! logged, never returned to the caller.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::services::store::SaveHook;
use crate::domain::StoreDocument;
use crate::infrastructure::traits::FileSystem;

/// Outcome of one sync pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Targets that are executable after the pass
    pub marked: Vec<PathBuf>,
    /// Targets that do not exist (yet)
    pub skipped: Vec<PathBuf>,
    /// Targets whose permissions could not be changed
    pub failed: Vec<(PathBuf, String)>,
}

/// Hook adding the executable bits to alias targets after each save.
pub struct PermissionSync {
    fs: Arc<dyn FileSystem>,
}

impl PermissionSync {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Run one pass over all targets in `doc`.
    pub fn sync(&self, doc: &StoreDocument) -> SyncReport {
        let mut report = SyncReport::default();
        for (name, target) in &doc.resolve {
            let path = Path::new(target);
            if !self.fs.is_file(path) {
                debug!("permission sync: skipping {} ({} missing)", name, target);
                report.skipped.push(path.to_path_buf());
                continue;
            }
            match self.fs.set_executable(path) {
                Ok(()) => report.marked.push(path.to_path_buf()),
                Err(e) => {
                    warn!("permission sync: cannot chmod +x {}: {}", target, e);
                    report.failed.push((path.to_path_buf(), e.to_string()));
                }
            }
        }
        report
    }
}

impl SaveHook for PermissionSync {
    fn name(&self) -> &str {
        "permission-sync"
    }

    fn after_save(&self, doc: &StoreDocument) {
        let report = self.sync(doc);
        debug!(
            "permission sync: {} marked, {} skipped, {} failed",
            report.marked.len(),
            report.skipped.len(),
            report.failed.len()
        );
    }
}
