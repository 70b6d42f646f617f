//! Review dump readers: a JSON array or JSONL, one review object per entry.
//!
//! Reading is **tolerant**: malformed JSONL lines are logged and skipped.
//! A file whose first non-blank character is `[` is parsed as one array and
//! must be valid as a whole.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::StoreError;

/// Reads all entries from a review dump file.
///
/// Returns the parsed values plus the number of malformed lines skipped.
///
/// # Errors
/// - [`StoreError::Io`] if the file cannot be read.
/// - [`StoreError::Parse`] if a JSON array dump is malformed.
pub fn read_dump(path: impl AsRef<Path>) -> Result<(Vec<Value>, usize), StoreError> {
    info!("Reading review dump: {:?}", path.as_ref());
    let raw = std::fs::read_to_string(path.as_ref())?;
    parse_dump(&raw)
}

/// Parses dump text; see [`read_dump`].
pub fn parse_dump(raw: &str) -> Result<(Vec<Value>, usize), StoreError> {
    if raw.trim_start().starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(raw)
            .map_err(|e| StoreError::Parse(format!("JSON array dump: {e}")))?;
        debug!("Loaded {} entries from JSON array", values.len());
        return Ok((values, 0));
    }

    let mut out = Vec::new();
    let mut malformed = 0usize;
    for (i, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(v) => out.push(v),
            Err(e) => {
                malformed += 1;
                warn!("Skipping malformed JSON on line {}: {}", i + 1, e);
            }
        }
    }

    debug!("Loaded {} JSONL entries ({} malformed)", out.len(), malformed);
    Ok((out, malformed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_array() {
        let (v, bad) = parse_dump(r#" [{"name":"A"},{"name":"B"}] "#).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(bad, 0);
    }

    #[test]
    fn jsonl_skips_blank_and_malformed_lines() {
        let raw = "{\"name\":\"A\"}\n\n{oops\n{\"name\":\"B\"}\n";
        let (v, bad) = parse_dump(raw).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(bad, 1);
    }

    #[test]
    fn broken_array_is_fatal() {
        assert!(matches!(
            parse_dump("[{\"name\":\"A\"},"),
            Err(StoreError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_dump("/definitely/not/here.jsonl").unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
