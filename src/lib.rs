//! tbird: personal command-alias manager
//!
//! Register a short name for a script file, then run it from anywhere with
//! `tb <name> [args...]`. Aliases and free-form settings live in a single
//! JSON store.
//!
//! Layers, innermost first:
//! - [`domain`]: store document, alias rules, dispatch lifecycle (no I/O)
//! - [`application`]: store, alias and dispatch services
//! - [`infrastructure`]: filesystem/process implementations, locking, DI
//! - [`cli`]: argument parsing, command handlers, output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
