//! Deterministic, pure logic behind output-path resolution.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! records and rule tables and return deterministic outputs suitable for tests.

pub mod error;
pub mod filename;
pub mod output_type;
pub mod record;
pub mod resolver;
pub mod rule;
pub mod tool;
