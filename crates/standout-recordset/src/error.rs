//! Error types for the recordset crate.

use thiserror::Error;

use crate::op::Op;

/// Errors surfaced while evaluating, materializing, or counting a record set.
#[derive(Debug, Error)]
pub enum RecordSetError {
    /// A `LIKE` pattern could not be compiled.
    #[error("invalid like pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The operand does not have the shape the operator requires.
    #[error("operator '{op}' expects a {expected} operand")]
    OperandShape { op: Op, expected: &'static str },

    /// A raw record lacks an attribute the record type requires.
    #[error("missing attribute '{0}'")]
    MissingAttribute(String),

    /// A raw record carries an attribute of the wrong type.
    #[error("attribute '{name}' is not a {expected}")]
    InvalidAttribute { name: String, expected: &'static str },

    /// Serialized records could not be rendered as JSON.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend failed to fetch or count.
    #[error("backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RecordSetError {
    /// Wraps any backend error.
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        RecordSetError::Backend(err.into())
    }
}

/// Result type for recordset operations.
pub type Result<T> = std::result::Result<T, RecordSetError>;
