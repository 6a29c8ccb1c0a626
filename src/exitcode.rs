//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination (tree is balanced)
pub const OK: i32 = 0;

/// Check completed, tree is not balanced
pub const UNBALANCED: i32 = 1;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (malformed tree, invalid child reference)
pub const DATAERR: i32 = 65;

/// Cannot open input
pub const NOINPUT: i32 = 66;

/// Internal software error (depth limit, height overflow)
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
