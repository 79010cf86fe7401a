//! Stable exit codes for `outpaths` and `pkggen`.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid invocation, unreadable input or other I/O errors.
pub const INVALID: i32 = 1;
/// A rule table is misconfigured (cycle, unknown output type, empty basename, ...).
pub const CONFIG: i32 = 2;
