//! Flat-file record store.
//!
//! Each table is one UTF-8 text file: a header line naming the columns, then
//! one comma-delimited line per record. There is no escaping, no index and no
//! cache; every call re-reads or rewrites the whole file.
//!
//! # Operations
//!
//! - **Schema check**: create the file or repair its header ([`Table::ensure_schema`])
//! - **List**: lazily decode all rows, optionally filtered ([`Table::list_all`])
//! - **Append**: validate required columns and add one line ([`Table::append`])
//! - **Delete**: rewrite the file without the matching rows ([`Table::delete_matching`])

pub mod error;
pub mod line;
pub mod schema;
pub mod table;

// Re-export primary types for convenience.
pub use error::{RecordError, StoreError};
pub use schema::{Record, Schema, SchemaStatus};
pub use table::{Rows, Table};
