//! Error types for record store operations.

/// Errors produced by table operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{table}: {column} must not be empty")]
    EmptyField {
        table: &'static str,
        column: &'static str,
    },

    #[error("{table}: {column} must not contain a line break")]
    LineBreak {
        table: &'static str,
        column: &'static str,
    },
}

impl StoreError {
    /// Returns `true` for errors caused by the record's values rather than
    /// by the file system.
    pub fn is_validation(&self) -> bool {
        !matches!(self, StoreError::Io(_))
    }
}

/// A data line that cannot be decoded into a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid {column}: {value:?}")]
    InvalidValue {
        column: &'static str,
        value: String,
    },
}
