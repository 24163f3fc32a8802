//! Data file parsing.
//!
//! The producer rewrites the file in place several times a second, so a read
//! may catch it empty or half-written. Every failure here (missing file,
//! unreadable file, missing required keys) is expected and collapses to
//! `None`; the next tick simply tries again.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::{FieldValue, WindRecord};

/// Upper bound on bytes read from the data file.
///
/// The real file is a dozen short lines; the cap keeps a wrong path (say, a
/// large log) from stalling the poll loop.
pub const MAX_DATA_FILE_BYTES: u64 = 1024 * 1024;

/// Read and validate the data file at `path`.
pub fn parse_wind_file(path: &Path) -> Option<WindRecord> {
    if !path.exists() {
        return None;
    }

    let mut bytes = Vec::new();
    let read = File::open(path).and_then(|f| f.take(MAX_DATA_FILE_BYTES).read_to_end(&mut bytes));
    if let Err(e) = read {
        tracing::debug!(path = %path.display(), error = %e, "data file not readable");
        return None;
    }

    let text = String::from_utf8_lossy(&bytes);
    let record = parse_wind_text(&text);
    if record.is_none() {
        tracing::debug!(path = %path.display(), "data file missing speed or direction_deg");
    }
    record
}

/// Parse in-memory file contents into a record.
pub fn parse_wind_text(text: &str) -> Option<WindRecord> {
    WindRecord::from_fields(parse_fields(text))
}

/// Parse `key=value` lines without validating required keys.
///
/// Keys are lower-cased; later duplicates win. Blank lines and lines without
/// `=` are skipped.
pub fn parse_fields(text: &str) -> BTreeMap<String, FieldValue> {
    let mut fields = BTreeMap::new();
    for line in text.split(['\n', '\r']) {
        let line = line.trim();
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        fields.insert(key, FieldValue::parse(value.trim()));
    }
    fields
}
