//! Exclusive lock around store read-modify-write cycles.
//!
//! The lock lives next to the store (`<store>.lock`) and uses OS-level
//! advisory locking via `fs2`, so it works across processes. Acquisition
//! blocks until a concurrent `tb` invocation finishes its save. The lock is
//! released when the guard is dropped.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::infrastructure::{InfraError, InfraResult};

/// An exclusive lock on the store file.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
    file: File,
}

impl StoreLock {
    /// Path of the lock file guarding `store_path`.
    pub fn lock_path(store_path: &Path) -> PathBuf {
        let mut name = store_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        store_path.with_file_name(name)
    }

    /// Acquire the lock for `store_path`, waiting for other holders.
    pub fn acquire(store_path: &Path) -> InfraResult<Self> {
        let path = Self::lock_path(store_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| InfraError::io(format!("open lock {}", path.display()), e))?;

        file.lock_exclusive()
            .map_err(|e| InfraError::io(format!("lock {}", path.display()), e))?;
        debug!("acquired store lock: {}", path.display());

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        // Closing the handle releases the lock as well; unlock explicitly to
        // report problems in debug output.
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!("failed to release store lock {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_store_path_when_deriving_lock_then_appends_suffix() {
        let lock = StoreLock::lock_path(Path::new("/data/tbird/store.json"));
        assert_eq!(lock, PathBuf::from("/data/tbird/store.json.lock"));
    }

    #[test]
    fn given_held_lock_when_trying_second_then_would_block() {
        let temp = TempDir::new().unwrap();
        let store = temp.path().join("store.json");

        let guard = StoreLock::acquire(&store).unwrap();
        let other = File::open(guard.path()).unwrap();
        assert!(other.try_lock_exclusive().is_err());

        drop(guard);
        assert!(other.try_lock_exclusive().is_ok());
    }
}
