//! Record source: reads raw JSON records from an input file.
//!
//! Two encodings are accepted, detected from the first non-whitespace
//! character after an optional byte-order mark:
//!
//! - a single JSON array of objects;
//! - JSON Lines, one object per non-empty line.
//!
//! A file that starts with `[` but does not parse as one array is read as
//! JSON Lines instead. It is only a parse error if no line yields a record.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use chaingraph_core::RawRecord;

use crate::error::SourceError;

/// Records read from one file, plus the entries that were skipped.
#[derive(Debug, Default)]
pub struct SourceBatch {
    pub records: Vec<RawRecord>,
    pub skipped: Vec<SkippedEntry>,
}

/// An entry excluded from the batch.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkippedEntry {
    /// 1-based line number (JSON Lines) or element index (array).
    pub position: usize,
    pub reason: String,
}

/// Read up to `limit` records from `path`, in file order.
///
/// Blank lines are ignored. Lines that are not valid JSON objects are logged
/// and skipped. Once `limit` records are collected no further input is parsed.
///
/// The whole file must be valid UTF-8; a single invalid byte fails the read
/// with [`SourceError::Io`].
pub fn read_records(path: &Path, limit: Option<usize>) -> Result<SourceBatch, SourceError> {
    let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let batch = if text.trim_start().starts_with('[') {
        match serde_json::from_str::<Vec<Value>>(text) {
            Ok(values) => read_array(path, values, limit),
            Err(source) => {
                let batch = read_lines(path, text, limit);
                if batch.records.is_empty() && !batch.skipped.is_empty() {
                    return Err(SourceError::Parse {
                        path: path.to_path_buf(),
                        source,
                    });
                }
                tracing::debug!(path = %path.display(), "Not a JSON array, read as JSON Lines");
                batch
            }
        }
    } else {
        read_lines(path, text, limit)
    };

    tracing::info!(
        path = %path.display(),
        records = batch.records.len(),
        skipped = batch.skipped.len(),
        "Read input file"
    );
    Ok(batch)
}

fn read_array(path: &Path, values: Vec<Value>, limit: Option<usize>) -> SourceBatch {
    let mut batch = SourceBatch::default();
    for (index, value) in values.into_iter().enumerate() {
        if reached(&batch, limit) {
            break;
        }
        match value {
            Value::Object(record) => batch.records.push(record),
            other => skip(&mut batch, path, index + 1, not_an_object(&other)),
        }
    }
    batch
}

fn read_lines(path: &Path, text: &str, limit: Option<usize>) -> SourceBatch {
    let mut batch = SourceBatch::default();

    for (index, line) in text.lines().enumerate() {
        if reached(&batch, limit) {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(record)) => batch.records.push(record),
            Ok(other) => skip(&mut batch, path, index + 1, not_an_object(&other)),
            Err(e) => skip(&mut batch, path, index + 1, e.to_string()),
        }
    }
    batch
}

fn reached(batch: &SourceBatch, limit: Option<usize>) -> bool {
    limit.is_some_and(|max| batch.records.len() >= max)
}

fn skip(batch: &mut SourceBatch, path: &Path, position: usize, reason: String) {
    tracing::warn!(
        path = %path.display(),
        position,
        reason = %reason,
        "Skipping malformed input entry"
    );
    batch.skipped.push(SkippedEntry { position, reason });
}

fn not_an_object(value: &Value) -> String {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("expected a JSON object, found {kind}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn names(batch: &SourceBatch) -> Vec<&str> {
        batch
            .records
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn json_lines_with_limit_returns_first_k() {
        let file = write_file(
            "{\"name\": \"a\"}\n{\"name\": \"b\"}\n{\"name\": \"c\"}\n{\"name\": \"d\"}\n",
        );
        let batch = read_records(file.path(), Some(2)).unwrap();
        assert_eq!(names(&batch), vec!["a", "b"]);
    }

    #[test]
    fn limit_stops_before_malformed_tail() {
        let file = write_file("{\"name\": \"a\"}\n{\"name\": \"b\"}\nnot json\n");
        let batch = read_records(file.path(), Some(2)).unwrap();
        assert_eq!(names(&batch), vec!["a", "b"]);
        assert!(batch.skipped.is_empty());
    }

    #[test]
    fn json_lines_skips_blank_and_malformed_lines() {
        let file = write_file(
            "{\"name\": \"a\"}\n\n   \n{\"name\": broken\n[1, 2]\n{\"name\": \"b\"}\r\n",
        );
        let batch = read_records(file.path(), Some(100)).unwrap();

        assert_eq!(names(&batch), vec!["a", "b"]);
        assert_eq!(batch.skipped.len(), 2);
        assert_eq!(batch.skipped[0].position, 4);
        assert_eq!(batch.skipped[1].position, 5);
        assert!(batch.skipped[1].reason.contains("array"));
    }

    #[test]
    fn json_lines_starting_with_bracket_keeps_later_lines() {
        let file = write_file("[broken\n{\"name\":\"a\"}\n{\"name\":\"b\"}\n");
        let batch = read_records(file.path(), None).unwrap();

        assert_eq!(names(&batch), vec!["a", "b"]);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].position, 1);

        let file = write_file("[1, 2]\n{\"name\": \"c\"}\n");
        let batch = read_records(file.path(), None).unwrap();
        assert_eq!(names(&batch), vec!["c"]);
    }

    #[test]
    fn json_array_is_accepted() {
        let file = write_file("  [\n{\"name\": \"a\"},\n42,\n{\"name\": \"b\"}\n]");
        let batch = read_records(file.path(), None).unwrap();
        assert_eq!(names(&batch), vec!["a", "b"]);
        assert_eq!(batch.skipped[0].position, 2);

        let batch = read_records(file.path(), Some(1)).unwrap();
        assert_eq!(names(&batch), vec!["a"]);
    }

    #[test]
    fn byte_order_mark_is_tolerated() {
        let file = write_file("\u{feff}{\"name\": \"华为\"}\n");
        let batch = read_records(file.path(), None).unwrap();
        assert_eq!(names(&batch), vec!["华为"]);

        let file = write_file("\u{feff}[{\"name\": \"华为\"}]");
        let batch = read_records(file.path(), None).unwrap();
        assert_eq!(names(&batch), vec!["华为"]);
    }

    #[test]
    fn zero_limit_reads_nothing() {
        let file = write_file("{\"name\": \"a\"}\n");
        let batch = read_records(file.path(), Some(0)).unwrap();
        assert!(batch.records.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_records(&dir.path().join("nope.json"), None);
        assert!(matches!(result, Err(SourceError::Io { .. })));
    }

    #[test]
    fn broken_array_is_a_parse_error() {
        let file = write_file("[{\"name\": \"a\"},");
        let result = read_records(file.path(), None);
        assert!(matches!(result, Err(SourceError::Parse { .. })));
    }

    #[test]
    fn invalid_utf8_fails_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"name\": \"a\xff\"}\n").unwrap();
        let result = read_records(file.path(), None);
        assert!(matches!(result, Err(SourceError::Io { .. })));
    }
}
