//! Table schemas and the record trait.

use std::fmt;

use crate::error::RecordError;

/// Fixed column layout of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Table name, used in logs and error messages.
    pub name: &'static str,
    /// Ordered column names; also the header line.
    pub columns: &'static [&'static str],
    /// Columns that must be non-empty when a row is appended.
    pub required: &'static [&'static str],
}

impl Schema {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Header line as written to disk (with terminator).
    pub fn header_line(&self) -> String {
        crate::line::join_fields(self.columns)
    }

    /// Checks that a decoded row has exactly one field per column.
    ///
    /// A value written with an embedded delimiter makes its row too wide; such
    /// rows are rejected rather than read with their columns shifted.
    pub fn check_width(&self, fields: &[&str]) -> Result<(), RecordError> {
        if fields.len() != self.width() {
            return Err(RecordError::FieldCount {
                expected: self.width(),
                found: fields.len(),
            });
        }
        Ok(())
    }
}

/// A row type persisted in a [`Table`](crate::Table).
pub trait Record: Sized {
    /// Column layout shared by every row of this type.
    const SCHEMA: Schema;

    /// Field values in column order.
    fn fields(&self) -> Vec<&str>;

    /// Decodes one row. `fields` holds exactly `SCHEMA.width()` entries.
    fn from_fields(fields: &[&str]) -> Result<Self, RecordError>;
}

/// Outcome of a schema check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    /// The file already started with the expected header.
    Valid,
    /// The file did not exist and was created with only the header.
    Created,
    /// The first line was missing or wrong and has been replaced.
    Repaired { preserved_lines: usize },
}

impl fmt::Display for SchemaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaStatus::Valid => write!(f, "valid"),
            SchemaStatus::Created => write!(f, "created"),
            SchemaStatus::Repaired { preserved_lines } => {
                write!(f, "repaired ({preserved_lines} lines kept)")
            }
        }
    }
}
