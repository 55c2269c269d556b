//! Resolution store service
//!
//! Sole reader and writer of the JSON store document. Every mutation is a
//! whole-document rewrite: load, modify in memory, persist. Writes go to a
//! sibling temporary file which is then renamed over the store, so a failed
//! write leaves the previous document intact.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{deep_merge, is_blank_value, StoreDocument};
use crate::infrastructure::traits::FileSystem;

/// Observer invoked after every successful save.
///
/// Hooks are best-effort: they cannot fail the save that triggered them.
pub trait SaveHook: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &str;

    /// Called with the document as it was persisted.
    fn after_save(&self, doc: &StoreDocument);
}

/// Service owning the on-disk store document.
pub struct StoreService {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    hooks: Vec<Arc<dyn SaveHook>>,
}

impl StoreService {
    /// Create a store service for the document at `path`.
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
            hooks: Vec::new(),
        }
    }

    /// Register a post-save hook.
    pub fn with_hook(mut self, hook: Arc<dyn SaveHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.fs.exists(&self.path)
    }

    /// Create the default document if no store exists yet.
    ///
    /// Returns `true` if a new store was written.
    pub fn init(&self) -> ApplicationResult<bool> {
        if self.exists() {
            return Ok(false);
        }
        debug!("init: creating store at {}", self.path.display());
        self.write_document(&StoreDocument::default())?;
        Ok(true)
    }

    /// Read and parse the persisted document.
    pub fn load(&self) -> ApplicationResult<StoreDocument> {
        if !self.exists() {
            return Err(ApplicationError::StoreMissing(self.path.clone()));
        }
        let content = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read store", &self.path)?;
        serde_json::from_str(&content).map_err(|e| ApplicationError::StoreCorrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Deep-merge `partial` into the persisted document and write the result.
    ///
    /// Values in `partial` override or extend the stored ones; keys missing
    /// from `partial` are kept. Returns the document as persisted.
    pub fn merge_save(&self, partial: &StoreDocument) -> ApplicationResult<StoreDocument> {
        let current = match self.load() {
            Ok(doc) => Some(doc),
            Err(ApplicationError::StoreMissing(_)) => None,
            Err(e) => return Err(e),
        };

        let merged = match current {
            Some(current) => {
                let mut base = to_value(&current)?;
                deep_merge(&mut base, to_value(partial)?);
                serde_json::from_value(base).map_err(|e| ApplicationError::OperationFailed {
                    context: format!("merge into store {}", self.path.display()),
                    source: Box::new(e),
                })?
            }
            None => partial.clone(),
        };
        debug!("merge_save: {} aliases", merged.resolve.len());

        self.write_document(&merged)?;
        self.run_hooks(&merged);
        Ok(merged)
    }

    /// Persist `doc` wholesale, replacing the stored document.
    pub fn replace_save(&self, doc: &StoreDocument) -> ApplicationResult<()> {
        debug!("replace_save: {} aliases", doc.resolve.len());
        self.write_document(doc)?;
        self.run_hooks(doc);
        Ok(())
    }

    /// Set or unset a store setting.
    ///
    /// An empty or absent `value` removes the key. Returns `false` (and
    /// writes nothing) if the document has no settings section.
    pub fn set_setting(&self, key: &str, value: Option<Value>) -> ApplicationResult<bool> {
        let mut doc = self.load()?;
        let Some(settings) = doc.settings.as_mut() else {
            warn!(
                "store {} has no settings section, not setting '{}'",
                self.path.display(),
                key
            );
            return Ok(false);
        };

        match value.filter(|v| !is_blank_value(v)) {
            Some(value) => {
                debug!("set_setting: {}={}", key, value);
                settings.insert(key.to_string(), value);
                self.merge_save(&doc)?;
            }
            None => {
                debug!("set_setting: unset {}", key);
                // A merge would bring the key back, so removal needs a replace
                if settings.remove(key).is_some() {
                    self.replace_save(&doc)?;
                }
            }
        }
        Ok(true)
    }

    /// Read a single store setting.
    pub fn get_setting(&self, key: &str) -> ApplicationResult<Option<Value>> {
        let doc = self.load()?;
        Ok(doc.setting(key).cloned())
    }

    fn write_document(&self, doc: &StoreDocument) -> ApplicationResult<()> {
        let content = render_document(doc)?;
        let tmp = tmp_path(&self.path);

        self.fs.ensure_parent(&self.path).store_write(&self.path)?;
        self.fs.write(&tmp, &content).store_write(&self.path)?;
        if let Err(e) = self.fs.rename(&tmp, &self.path) {
            let _ = self.fs.remove_file(&tmp);
            return Err(ApplicationError::StoreWrite {
                path: self.path.clone(),
                source: e,
            });
        }
        Ok(())
    }

    fn run_hooks(&self, doc: &StoreDocument) {
        for hook in &self.hooks {
            debug!("running post-save hook: {}", hook.name());
            hook.after_save(doc);
        }
    }
}

/// Serialize a document as JSON with 4-space indentation.
pub fn render_document(doc: &StoreDocument) -> ApplicationResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)
        .map_err(|e| ApplicationError::OperationFailed {
            context: "serialize store".into(),
            source: Box::new(e),
        })?;
    String::from_utf8(buf).map_err(|e| ApplicationError::OperationFailed {
        context: "serialize store".into(),
        source: Box::new(e),
    })
}

fn to_value(doc: &StoreDocument) -> ApplicationResult<Value> {
    serde_json::to_value(doc).map_err(|e| ApplicationError::OperationFailed {
        context: "convert store document".into(),
        source: Box::new(e),
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
