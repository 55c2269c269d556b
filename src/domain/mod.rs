//! Domain layer: entities and alias rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod alias;
pub mod dispatch;
pub mod entities;
pub mod error;
pub mod merge;

pub use alias::{is_reserved, validate_alias_name, AliasQuery, RESERVED_NAMES};
pub use dispatch::DispatchState;
pub use entities::*;
pub use error::DomainError;
pub use merge::deep_merge;
