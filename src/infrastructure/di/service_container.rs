//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::{AliasService, Dispatcher, PermissionSync, StoreService};
use crate::config::Settings;
use crate::infrastructure::traits::{CommandRunner, FileSystem, RealCommandRunner, RealFileSystem};
use crate::infrastructure::{InfraError, InfraResult, StoreLock};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,

    /// The resolution store, with post-save hooks attached
    pub store: Arc<StoreService>,

    /// Directory relative alias paths are resolved against
    pub cwd: PathBuf,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e))?;
        Ok(Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            cwd,
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        cwd: PathBuf,
    ) -> Self {
        let mut store = StoreService::new(fs.clone(), settings.store_path.clone());
        if settings.sync_permissions {
            store = store.with_hook(Arc::new(PermissionSync::new(fs.clone())));
        }
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            cmd,
            store: Arc::new(store),
            cwd,
        }
    }

    /// Alias operations bound to this container's store.
    pub fn alias_service(&self) -> AliasService {
        AliasService::new(self.store.clone(), self.fs.clone(), self.cwd.clone())
    }

    /// Dispatcher bound to this container's store and runner.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.store.clone(), self.fs.clone(), self.cmd.clone())
    }

    /// Take the store lock if locking is enabled.
    ///
    /// Hold the returned guard across a whole load-modify-save cycle.
    pub fn lock_store(&self) -> InfraResult<Option<StoreLock>> {
        if !self.settings.lock {
            return Ok(None);
        }
        StoreLock::acquire(self.store.path()).map(Some)
    }
}
