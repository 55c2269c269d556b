//! Standard exit codes (BSD sysexits.h compatible)
//!
//! `tb run` does not use these: it exits with the child's own code.

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error (reserved name, alias already exists)
pub const USAGE: i32 = 64;

/// Data format error (corrupt store)
pub const DATAERR: i32 = 65;

/// Cannot open input (unknown alias, missing store)
pub const NOINPUT: i32 = 66;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// System error (child could not be started)
pub const OSERR: i32 = 71;

/// Can't create output file (store write failed)
pub const CANTCREAT: i32 = 73;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;

/// Offset added to a signal number when a child was killed by a signal
pub const SIGNAL_BASE: i32 = 128;
