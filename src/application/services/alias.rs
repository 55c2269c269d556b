//! Alias management service
//!
//! Create, rename, re-target and remove aliases on top of the store
//! primitives. Additions persist with a merge-save; anything that drops a key
//! persists with a replace-save so the old entry cannot be merged back.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::application::services::manifest::ManifestLookup;
use crate::application::services::store::StoreService;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{validate_alias_name, AliasQuery, DomainError};
use crate::infrastructure::traits::FileSystem;
use crate::util::path::{absolutize, to_store_string};

/// One row of the resolve table, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub name: String,
    pub path: String,
    /// Description from a neighbouring package manifest, if any
    pub description: Option<String>,
}

/// Result of registering a whole directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UseReport {
    /// (name, absolute path) pairs written to the store
    pub registered: Vec<(String, String)>,
    /// (name, reason) pairs that were left alone
    pub skipped: Vec<(String, String)>,
}

/// Service for alias table operations.
pub struct AliasService {
    store: Arc<StoreService>,
    fs: Arc<dyn FileSystem>,
    manifest: ManifestLookup,
    cwd: PathBuf,
}

impl AliasService {
    /// Create a new alias service resolving relative paths against `cwd`.
    pub fn new(store: Arc<StoreService>, fs: Arc<dyn FileSystem>, cwd: PathBuf) -> Self {
        let manifest = ManifestLookup::new(fs.clone());
        Self {
            store,
            fs,
            manifest,
            cwd,
        }
    }

    /// Register `name` for `path`.
    ///
    /// Fails on reserved names, and on existing names unless `overwrite`.
    pub fn create(
        &self,
        name: &str,
        path: &Path,
        overwrite: bool,
    ) -> ApplicationResult<AliasEntry> {
        debug!(
            "create: name={}, path={}, overwrite={}",
            name,
            path.display(),
            overwrite
        );
        validate_alias_name(name)?;

        let mut doc = self.store.load()?;
        if doc.contains(name) && !overwrite {
            return Err(DomainError::AliasExists(name.to_string()).into());
        }

        let target = to_store_string(&self.absolute(path));
        doc.insert(name, target.clone());
        self.store.merge_save(&doc)?;

        Ok(AliasEntry {
            name: name.to_string(),
            path: target,
            description: None,
        })
    }

    /// Register `path` under a name derived from its package manifest
    /// (or its directory name).
    pub fn create_inherited(
        &self,
        path: &Path,
        overwrite: bool,
    ) -> ApplicationResult<AliasEntry> {
        let target = self.absolute(path);
        let name = self.manifest.inherit_name(&target).ok_or_else(|| {
            ApplicationError::Domain(DomainError::InvalidName {
                name: String::new(),
                reason: format!("cannot derive a name from {}", target.display()),
            })
        })?;
        debug!(
            "create_inherited: derived name {} for {}",
            name,
            target.display()
        );
        self.create(&name, &target, overwrite)
    }

    /// Remove `name` from the table. Returns the path it pointed to.
    pub fn remove(&self, name: &str) -> ApplicationResult<String> {
        debug!("remove: name={}", name);
        let mut doc = self.store.load()?;
        let removed = doc
            .remove(name)
            .ok_or_else(|| ApplicationError::unknown_alias(name))?;
        self.store.replace_save(&doc)?;
        Ok(removed)
    }

    /// Point `name` at `new_path`. Returns the new absolute path.
    pub fn update_path(&self, name: &str, new_path: &Path) -> ApplicationResult<String> {
        debug!("update_path: name={}, new_path={}", name, new_path.display());
        let mut doc = self.store.load()?;
        if !doc.contains(name) {
            return Err(ApplicationError::unknown_alias(name));
        }
        let target = to_store_string(&self.absolute(new_path));
        doc.insert(name, target.clone());
        self.store.replace_save(&doc)?;
        Ok(target)
    }

    /// Move the target of `old` to `new`. Returns the moved path.
    pub fn update_name(&self, old: &str, new: &str) -> ApplicationResult<String> {
        debug!("update_name: {} -> {}", old, new);
        let mut doc = self.store.load()?;
        if !doc.contains(old) {
            return Err(ApplicationError::unknown_alias(old));
        }
        if old == new {
            return Ok(doc.resolve(old).unwrap_or_default().to_string());
        }
        validate_alias_name(new)?;
        if doc.contains(new) {
            return Err(DomainError::AliasExists(new.to_string()).into());
        }

        let path = doc
            .rename(old, new)
            .ok_or_else(|| ApplicationError::unknown_alias(old))?;
        self.store.replace_save(&doc)?;
        Ok(path)
    }

    /// Aliases whose name matches `query` (regex, or plain text if the
    /// query is not a valid pattern). No mutation.
    pub fn search(&self, query: &str) -> ApplicationResult<IndexMap<String, String>> {
        debug!("search: query={}", query);
        let query = AliasQuery::parse(query);
        let doc = self.store.load()?;
        Ok(doc
            .resolve
            .into_iter()
            .filter(|(name, _)| query.matches(name))
            .collect())
    }

    /// The full resolve table.
    pub fn list(&self) -> ApplicationResult<IndexMap<String, String>> {
        Ok(self.store.load()?.resolve)
    }

    /// Attach manifest descriptions to a set of aliases.
    pub fn describe_all(&self, aliases: IndexMap<String, String>) -> Vec<AliasEntry> {
        aliases
            .into_iter()
            .map(|(name, path)| {
                let description = self.manifest.describe(Path::new(&path));
                AliasEntry {
                    name,
                    path,
                    description,
                }
            })
            .collect()
    }

    /// Register every regular file directly inside `dir` under its file stem.
    ///
    /// Reserved and invalid names are skipped, as are existing names unless
    /// `overwrite`. All registrations are persisted in a single save.
    pub fn use_directory(&self, dir: &Path, overwrite: bool) -> ApplicationResult<UseReport> {
        let dir = self.absolute(dir);
        debug!("use_directory: dir={}, overwrite={}", dir.display(), overwrite);
        if !self.fs.is_dir(&dir) {
            return Err(ApplicationError::OperationFailed {
                context: format!("not a directory: {}", dir.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "directory does not exist",
                )),
            });
        }

        let files = self.fs.list_files(&dir).with_path_context("read directory", &dir)?;
        let mut doc = self.store.load()?;
        let mut report = UseReport::default();

        for file in files {
            let Some(name) = file.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            if let Err(e) = validate_alias_name(&name) {
                report.skipped.push((name, e.to_string()));
                continue;
            }
            if report.registered.iter().any(|(n, _)| n == &name) {
                report
                    .skipped
                    .push((name, "duplicate file stem in directory".into()));
                continue;
            }
            if doc.contains(&name) && !overwrite {
                report.skipped.push((name, "alias already exists".into()));
                continue;
            }
            let target = to_store_string(&file);
            doc.insert(name.clone(), target.clone());
            report.registered.push((name, target));
        }

        if !report.registered.is_empty() {
            self.store.merge_save(&doc)?;
        }
        Ok(report)
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        absolutize(path, &self.cwd)
    }
}
