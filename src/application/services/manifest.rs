//! Package manifest lookup
//!
//! Optional capability: scripts living in a package directory may carry a
//! `package.json` next to them. Its `name` can seed an alias name
//! (`create --inherit`) and its `description` decorates listings. Every
//! lookup returns `None` when there is nothing usable.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::infrastructure::traits::FileSystem;

/// File name of the manifest looked up next to alias targets.
pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, Default, Deserialize)]
struct PackageManifest {
    name: Option<String>,
    description: Option<String>,
}

/// Reads neighbouring package manifests.
pub struct ManifestLookup {
    fs: Arc<dyn FileSystem>,
}

impl ManifestLookup {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Directory owning `target`: the path itself if it is a directory,
    /// its parent otherwise.
    pub fn owning_dir(&self, target: &Path) -> PathBuf {
        if self.fs.is_dir(target) {
            return target.to_path_buf();
        }
        target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// `description` of the manifest next to `target`.
    pub fn describe(&self, target: &Path) -> Option<String> {
        self.read(&self.owning_dir(target))?
            .description
            .filter(|d| !d.trim().is_empty())
    }

    /// `name` of the manifest next to `target`.
    pub fn package_name(&self, target: &Path) -> Option<String> {
        self.read(&self.owning_dir(target))?
            .name
            .filter(|n| !n.trim().is_empty())
    }

    /// Name to register `target` under when inheriting: the manifest name,
    /// else the name of the owning directory.
    pub fn inherit_name(&self, target: &Path) -> Option<String> {
        if let Some(name) = self.package_name(target) {
            return Some(name);
        }
        let dir = self.owning_dir(target);
        debug!("no manifest name for {}, using directory name", dir.display());
        dir.file_name().map(|n| n.to_string_lossy().into_owned())
    }

    fn read(&self, dir: &Path) -> Option<PackageManifest> {
        let path = dir.join(MANIFEST_FILE);
        if !self.fs.is_file(&path) {
            return None;
        }
        let content = self.fs.read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                debug!("ignoring unreadable manifest {}: {}", path.display(), e);
                None
            }
        }
    }
}
