//! I/O helpers for the `outpaths` commands.

pub mod catalog_file;
pub mod probe;
pub mod process;
pub mod record_file;
