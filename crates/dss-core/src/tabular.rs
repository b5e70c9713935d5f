//! Shared helpers for reading delimited text with a header row.

use crate::error::{CoreError, CoreResult};

/// Build a strict reader: header row required, equal column counts, fields trimmed.
pub(crate) fn reader(bytes: &[u8], delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(bytes)
}

/// Read the header row, failing when the input has none.
pub(crate) fn headers(
    reader: &mut csv::Reader<&[u8]>,
    source_name: &str,
) -> CoreResult<csv::StringRecord> {
    let headers = reader
        .headers()
        .map_err(|e| malformed(e, source_name))?
        .clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(CoreError::MissingHeader {
            source_name: source_name.to_string(),
        });
    }
    Ok(headers)
}

/// Position of a named column in the header, ignoring a leading byte-order mark.
pub(crate) fn column_index(headers: &csv::StringRecord, column: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == column)
}

/// Like [`column_index`] but a missing column is a parse error.
pub(crate) fn require_column(
    headers: &csv::StringRecord,
    column: &str,
    source_name: &str,
) -> CoreResult<usize> {
    column_index(headers, column).ok_or_else(|| CoreError::MissingColumn {
        source_name: source_name.to_string(),
        column: column.to_string(),
    })
}

/// Convert a csv read error into a `MalformedRow` carrying the line number.
pub(crate) fn malformed(err: csv::Error, source_name: &str) -> CoreError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {} fields, found {}", expected_len, len),
        csv::ErrorKind::Utf8 { .. } => "invalid UTF-8".to_string(),
        _ => err.to_string(),
    };
    CoreError::MalformedRow {
        source_name: source_name.to_string(),
        line,
        message,
    }
}

/// Line number of a record for error messages.
pub(crate) fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}
