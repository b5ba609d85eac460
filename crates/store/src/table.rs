//! Generic flat-file table.
//!
//! A [`Table`] holds no open file and no cached rows: every operation opens
//! the backing file, reads or rewrites it completely, and closes it again.
//! Nothing here is atomic. A crash in the middle of a rewrite can lose rows.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::iter::{Enumerate, Filter};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{RecordError, StoreError};
use crate::line;
use crate::schema::{Record, SchemaStatus};

/// A table of `R` rows stored in one delimited text file.
#[derive(Debug, Clone)]
pub struct Table<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Table<R> {
    /// Creates a handle on the file at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Makes sure the file exists and starts with the expected header.
    ///
    /// A missing file is created with only the header. If the first line is
    /// missing or differs from the header, it is replaced and every following
    /// line is written back unchanged, malformed or not. Safe to call on
    /// every startup.
    pub fn ensure_schema(&self) -> Result<SchemaStatus, StoreError> {
        let schema = R::SCHEMA;

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::write(&self.path, schema.header_line())?;
                info!(table = schema.name, path = %self.path.display(), "created table");
                return Ok(SchemaStatus::Created);
            }
            Err(e) => return Err(e.into()),
        };

        let lines = line::lines_inclusive(&content);
        if lines
            .first()
            .is_some_and(|first| line::header_matches(first, schema.columns))
        {
            debug!(table = schema.name, "header valid");
            return Ok(SchemaStatus::Valid);
        }

        let body = lines.get(1..).unwrap_or_default();
        let mut repaired = schema.header_line();
        for raw in body {
            repaired.push_str(raw);
        }
        fs::write(&self.path, repaired)?;

        info!(
            table = schema.name,
            path = %self.path.display(),
            preserved_lines = body.len(),
            "rewrote table header"
        );
        Ok(SchemaStatus::Repaired {
            preserved_lines: body.len(),
        })
    }

    /// Reads the file and returns a lazy iterator over its records.
    ///
    /// The header line is skipped. Blank lines and rows that do not decode
    /// are skipped as well (the latter logged at `warn`).
    pub fn list_all(&self) -> Result<Rows<R>, StoreError> {
        let content = fs::read_to_string(&self.path)?;
        let lines: Vec<String> = content.lines().map(str::to_owned).collect();
        debug!(
            table = R::SCHEMA.name,
            lines = lines.len(),
            "loaded table"
        );
        Ok(Rows::new(lines))
    }

    /// Like [`list_all`](Self::list_all), keeping only rows accepted by `filter`.
    pub fn list_where<F>(&self, filter: F) -> Result<Filter<Rows<R>, F>, StoreError>
    where
        F: FnMut(&R) -> bool,
    {
        Ok(self.list_all()?.filter(filter))
    }

    /// Returns the first record accepted by `predicate`, scanning in file order.
    pub fn find_first<F>(&self, predicate: F) -> Result<Option<R>, StoreError>
    where
        F: FnMut(&R) -> bool,
    {
        Ok(self.list_all()?.find(predicate))
    }

    /// Writes one record at the end of the file.
    ///
    /// Required columns must be non-empty and no value may contain a line
    /// break; on failure the file is left untouched. A missing or empty file
    /// gets the header written before the row.
    pub fn append(&self, record: &R) -> Result<(), StoreError> {
        let schema = R::SCHEMA;
        let fields = record.fields();
        validate::<R>(&fields)?;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut out = String::new();
        if file.metadata()?.len() == 0 {
            debug!(table = schema.name, "writing header before first row");
            out.push_str(&schema.header_line());
        } else if missing_final_break(&mut file)? {
            out.push('\n');
        }
        out.push_str(&line::join_fields(&fields));
        file.write_all(out.as_bytes())?;

        info!(table = schema.name, "appended row");
        Ok(())
    }

    /// Removes every record accepted by `predicate` by rewriting the file.
    ///
    /// Returns the number of removed rows; `0` means nothing matched. The
    /// file is rewritten either way: header, then every retained line.
    /// Lines that do not decode are retained verbatim, blank lines are
    /// dropped. Every written line ends in `\n`, so retained `\r\n` rows are
    /// normalized.
    pub fn delete_matching<F>(&self, mut predicate: F) -> Result<usize, StoreError>
    where
        F: FnMut(&R) -> bool,
    {
        let schema = R::SCHEMA;
        let content = fs::read_to_string(&self.path)?;

        let mut out = schema.header_line();
        let mut removed = 0usize;
        for raw in content.lines().skip(1) {
            if raw.is_empty() {
                continue;
            }
            match decode::<R>(raw) {
                Ok(record) if predicate(&record) => {
                    removed += 1;
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(table = schema.name, error = %e, "keeping undecodable row");
                }
            }
            out.push_str(raw);
            out.push('\n');
        }

        fs::write(&self.path, out)?;

        if removed > 0 {
            info!(table = schema.name, removed, "deleted rows");
        } else {
            debug!(table = schema.name, "no rows matched delete");
        }
        Ok(removed)
    }
}

/// Lazy iterator over the records of one table read.
///
/// Owns the lines of the file as read; decoding happens as the iterator
/// advances.
pub struct Rows<R> {
    lines: Enumerate<std::vec::IntoIter<String>>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Rows<R> {
    fn new(lines: Vec<String>) -> Self {
        let mut lines = lines.into_iter().enumerate();
        // Header.
        lines.next();
        Self {
            lines,
            _record: PhantomData,
        }
    }
}

impl<R: Record> Iterator for Rows<R> {
    type Item = R;

    fn next(&mut self) -> Option<R> {
        for (idx, raw) in self.lines.by_ref() {
            if raw.is_empty() {
                continue;
            }
            match decode::<R>(&raw) {
                Ok(record) => return Some(record),
                Err(e) => {
                    warn!(
                        table = R::SCHEMA.name,
                        line = idx + 1,
                        error = %e,
                        "skipping malformed row"
                    );
                }
            }
        }
        None
    }
}

fn decode<R: Record>(raw: &str) -> Result<R, RecordError> {
    let fields = line::split_fields(raw);
    R::SCHEMA.check_width(&fields)?;
    R::from_fields(&fields)
}

fn validate<R: Record>(fields: &[&str]) -> Result<(), StoreError> {
    let schema = R::SCHEMA;
    for (&column, value) in schema.columns.iter().zip(fields) {
        if schema.required.contains(&column) && value.is_empty() {
            return Err(StoreError::EmptyField {
                table: schema.name,
                column,
            });
        }
        if value.contains(['\n', '\r']) {
            return Err(StoreError::LineBreak {
                table: schema.name,
                column,
            });
        }
    }
    Ok(())
}

/// Returns `true` if the last byte of a non-empty file is not `\n`.
fn missing_final_break(file: &mut fs::File) -> std::io::Result<bool> {
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    #[derive(Debug, Clone, PartialEq)]
    struct Pair {
        left: String,
        right: String,
    }

    impl Pair {
        fn new(left: &str, right: &str) -> Self {
            Self {
                left: left.into(),
                right: right.into(),
            }
        }
    }

    impl Record for Pair {
        const SCHEMA: Schema = Schema {
            name: "pairs",
            columns: &["Left", "Right"],
            required: &["Left"],
        };

        fn fields(&self) -> Vec<&str> {
            vec![self.left.as_str(), self.right.as_str()]
        }

        fn from_fields(fields: &[&str]) -> Result<Self, RecordError> {
            if fields[1] == "?" {
                return Err(RecordError::InvalidValue {
                    column: "Right",
                    value: fields[1].into(),
                });
            }
            Ok(Pair::new(fields[0], fields[1]))
        }
    }

    fn table_with(content: Option<&str>) -> (tempfile::TempDir, Table<Pair>) {
        let tmp = tempfile::tempdir().unwrap();
        let table = Table::<Pair>::new(tmp.path().join("pairs.csv"));
        if let Some(content) = content {
            fs::write(table.path(), content).unwrap();
        }
        (tmp, table)
    }

    fn read(table: &Table<Pair>) -> String {
        fs::read_to_string(table.path()).unwrap()
    }

    #[test]
    fn ensure_schema_creates_missing_file() {
        let (_tmp, table) = table_with(None);
        assert_eq!(table.ensure_schema().unwrap(), SchemaStatus::Created);
        assert_eq!(read(&table), "Left,Right\n");
    }

    #[test]
    fn ensure_schema_fills_empty_file() {
        let (_tmp, table) = table_with(Some(""));
        assert_eq!(
            table.ensure_schema().unwrap(),
            SchemaStatus::Repaired { preserved_lines: 0 }
        );
        assert_eq!(read(&table), "Left,Right\n");
    }

    #[test]
    fn ensure_schema_replaces_wrong_header() {
        let (_tmp, table) = table_with(Some("L,R\na,b\r\nc,d"));
        assert_eq!(
            table.ensure_schema().unwrap(),
            SchemaStatus::Repaired { preserved_lines: 2 }
        );
        assert_eq!(read(&table), "Left,Right\na,b\r\nc,d");
    }

    #[test]
    fn ensure_schema_replaces_headerless_first_line() {
        let (_tmp, table) = table_with(Some("a,b\nc,d\n"));
        table.ensure_schema().unwrap();
        assert_eq!(read(&table), "Left,Right\nc,d\n");
    }

    #[test]
    fn ensure_schema_carries_corrupt_body_forward() {
        let (_tmp, table) = table_with(Some("junk\n???\n,,,,\n"));
        table.ensure_schema().unwrap();
        assert_eq!(read(&table), "Left,Right\n???\n,,,,\n");
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let (_tmp, table) = table_with(Some("Left,Right\r\na,b\r\n"));
        assert_eq!(table.ensure_schema().unwrap(), SchemaStatus::Valid);
        assert_eq!(table.ensure_schema().unwrap(), SchemaStatus::Valid);
        assert_eq!(read(&table), "Left,Right\r\na,b\r\n");
    }

    #[test]
    fn append_then_list_round_trips() {
        let (_tmp, table) = table_with(None);
        table.ensure_schema().unwrap();
        table.append(&Pair::new("a", "b")).unwrap();

        let rows: Vec<Pair> = table.list_all().unwrap().collect();
        assert_eq!(rows, vec![Pair::new("a", "b")]);
        assert_eq!(read(&table), "Left,Right\na,b\n");
    }

    #[test]
    fn append_rejects_empty_required_column() {
        let (_tmp, table) = table_with(None);
        table.ensure_schema().unwrap();

        let err = table.append(&Pair::new("", "b")).unwrap_err();
        assert!(matches!(
            err,
            StoreError::EmptyField {
                table: "pairs",
                column: "Left"
            }
        ));
        assert!(err.is_validation());
        assert_eq!(read(&table), "Left,Right\n");
    }

    #[test]
    fn append_allows_empty_optional_column() {
        let (_tmp, table) = table_with(None);
        table.ensure_schema().unwrap();
        table.append(&Pair::new("a", "")).unwrap();
        assert_eq!(read(&table), "Left,Right\na,\n");
    }

    #[test]
    fn append_rejects_line_breaks() {
        let (_tmp, table) = table_with(None);
        table.ensure_schema().unwrap();

        let err = table.append(&Pair::new("a", "b\nc,d")).unwrap_err();
        assert!(matches!(err, StoreError::LineBreak { column: "Right", .. }));
        assert_eq!(read(&table), "Left,Right\n");
    }

    #[test]
    fn append_terminates_unterminated_last_line() {
        let (_tmp, table) = table_with(Some("Left,Right\na,b"));
        table.append(&Pair::new("c", "d")).unwrap();
        assert_eq!(read(&table), "Left,Right\na,b\nc,d\n");
    }

    #[test]
    fn append_to_missing_file_writes_header_first() {
        let (_tmp, table) = table_with(None);
        table.append(&Pair::new("a", "b")).unwrap();

        assert_eq!(read(&table), "Left,Right\na,b\n");
        let rows: Vec<Pair> = table.list_all().unwrap().collect();
        assert_eq!(rows, vec![Pair::new("a", "b")]);
        assert_eq!(table.ensure_schema().unwrap(), SchemaStatus::Valid);
    }

    #[test]
    fn append_to_empty_file_writes_header_first() {
        let (_tmp, table) = table_with(Some(""));
        table.append(&Pair::new("a", "b")).unwrap();
        assert_eq!(read(&table), "Left,Right\na,b\n");
    }

    #[test]
    fn list_skips_blank_and_malformed_rows() {
        let (_tmp, table) =
            table_with(Some("Left,Right\r\na,b\r\n\r\nshort\nx,?\ny,z,extra\nc,d\n"));

        let rows: Vec<Pair> = table.list_all().unwrap().collect();
        assert_eq!(rows, vec![Pair::new("a", "b"), Pair::new("c", "d")]);
    }

    #[test]
    fn delete_matching_keeps_wide_rows_verbatim() {
        let (_tmp, table) = table_with(Some("Left,Right\na,b,c\na,b\n"));

        assert_eq!(table.delete_matching(|p| p.left == "a").unwrap(), 1);
        assert_eq!(read(&table), "Left,Right\na,b,c\n");
    }

    #[test]
    fn delete_matching_normalizes_line_endings() {
        let (_tmp, table) = table_with(Some("Left,Right\r\na,b\r\nc,d\r\n"));

        assert_eq!(table.delete_matching(|p| p.left == "a").unwrap(), 1);
        assert_eq!(read(&table), "Left,Right\nc,d\n");
    }

    #[test]
    fn list_where_filters() {
        let (_tmp, table) = table_with(Some("Left,Right\na,1\nb,2\na,3\n"));

        let rows: Vec<Pair> = table.list_where(|p| p.left == "a").unwrap().collect();
        assert_eq!(rows, vec![Pair::new("a", "1"), Pair::new("a", "3")]);
    }

    #[test]
    fn list_missing_file_is_io_error() {
        let (_tmp, table) = table_with(None);
        assert!(matches!(table.list_all(), Err(StoreError::Io(_))));
    }

    #[test]
    fn delete_matching_removes_all_matches_once() {
        let (_tmp, table) = table_with(Some("Left,Right\na,1\nb,2\na,1\n"));

        assert_eq!(table.delete_matching(|p| p.left == "a").unwrap(), 2);
        assert_eq!(read(&table), "Left,Right\nb,2\n");

        assert_eq!(table.delete_matching(|p| p.left == "a").unwrap(), 0);
        assert_eq!(read(&table), "Left,Right\nb,2\n");
    }

    #[test]
    fn delete_matching_keeps_undecodable_lines() {
        let (_tmp, table) = table_with(Some("Left,Right\nshort\n\na,b\nc,d\n"));

        assert_eq!(table.delete_matching(|p| p.left == "a").unwrap(), 1);
        assert_eq!(read(&table), "Left,Right\nshort\nc,d\n");
    }

    #[test]
    fn delete_missing_file_is_io_error() {
        let (_tmp, table) = table_with(None);
        assert!(matches!(
            table.delete_matching(|_| true),
            Err(StoreError::Io(_))
        ));
    }

    #[test]
    fn find_first_returns_earliest_match() {
        let (_tmp, table) = table_with(Some("Left,Right\nb,0\na,1\na,2\n"));

        let found = table.find_first(|p| p.left == "a").unwrap();
        assert_eq!(found, Some(Pair::new("a", "1")));
        assert_eq!(table.find_first(|p| p.left == "z").unwrap(), None);
    }
}
