//! Error types for record construction and output resolution.

use thiserror::Error;

/// Failures building an [`InputRecord`](super::record::InputRecord).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("field '{field}' is not declared by this record")]
    UnknownField { field: String },

    #[error("field '{field}' has unsupported value type {kind}")]
    UnsupportedValue { field: String, kind: String },

    #[error("input record must be a JSON object, found {kind}")]
    NotAnObject { kind: String },
}

/// Configuration errors raised while resolving output paths.
///
/// Unmet guards never produce an error; the output is omitted instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("{tool}: mutually pointing name sources while resolving '{field}'")]
    Cycle { tool: String, field: String },

    #[error("{tool}: cannot generate a filename for '{field}' from an empty basename")]
    EmptyBasename { tool: String, field: String },

    #[error("{tool}: output type '{token}' is not known to this tool family")]
    UnknownOutputType { tool: String, token: String },

    #[error("unknown tool '{tool}'")]
    UnknownTool { tool: String },

    #[error("{tool}: rule references undeclared field '{field}'")]
    UnknownField { tool: String, field: String },

    #[error("{tool}: template '{template}' for '{output}' has more than one placeholder")]
    InvalidTemplate {
        tool: String,
        output: String,
        template: String,
    },

    #[error("{tool}: output '{output}' is declared more than once")]
    DuplicateOutput { tool: String, output: String },
}
