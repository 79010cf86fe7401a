//! Output-path resolution for neuroimaging tool wrappers.
//!
//! Each external tool is described by a [`ToolSpec`](core::tool::ToolSpec):
//! its declared inputs plus one [`OutputRule`](core::rule::OutputRule) per
//! output file. A single generic resolver turns an input record into the
//! absolute paths the tool will write.
//!
//! - **[`core`]**: Pure, deterministic logic (path splitting, records, rules,
//!   resolution). No I/O, fully testable in isolation.
//! - **[`catalog`]**: Built-in rule tables for FSL, AFNI and FreeSurfer wrappers.
//! - **[`io`]**: Side-effecting helpers (catalog/record files, tool probing).

pub mod catalog;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
