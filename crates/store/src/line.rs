//! Line codec for the table files.
//!
//! One record per line, fields separated by [`DELIMITER`]. There is no
//! quoting: a value that contains the delimiter shifts every column after it
//! on that row.

/// Field separator.
pub const DELIMITER: char = ',';

/// Strips a trailing `\n` or `\r\n`.
pub fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Splits a data line into its raw fields.
pub fn split_fields(line: &str) -> Vec<&str> {
    strip_terminator(line).split(DELIMITER).collect()
}

/// Joins fields into one line, terminator included.
pub fn join_fields(fields: &[&str]) -> String {
    let mut line = fields.join(&DELIMITER.to_string());
    line.push('\n');
    line
}

/// Returns `true` if `line` is exactly the given header.
///
/// Surrounding whitespace on the line is ignored; the fields themselves are
/// compared as-is.
pub fn header_matches(line: &str, columns: &[&str]) -> bool {
    let fields: Vec<&str> = line.trim().split(DELIMITER).collect();
    fields == columns
}

/// Splits file content into lines, each keeping its own terminator.
pub fn lines_inclusive(content: &str) -> Vec<&str> {
    content.split_inclusive('\n').collect()
}
