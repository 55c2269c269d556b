//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner)
//! but are themselves concrete structs, not traits.

mod alias;
mod dispatch;
mod manifest;
mod permissions;
mod store;

pub use alias::{AliasEntry, AliasService, UseReport};
pub use dispatch::{Dispatcher, LaunchPlan};
pub use manifest::{ManifestLookup, MANIFEST_FILE};
pub use permissions::{PermissionSync, SyncReport};
pub use store::{render_document, SaveHook, StoreService};
