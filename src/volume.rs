//! Volume call-number listings.
//!
//! One volume per line: an identifier, whitespace, then a bracketed list of
//! quoted call numbers:
//!
//! ```text
//! uc2.ark:/13960/t57d2rr1p        ['QH81 .W68', 'QH81 .W56']
//! ```
//!
//! The category of a call number is everything before its first `.`, trimmed
//! (`QH81` above). Every call number yields a [`VolumeRecord`]; whether the
//! category is well formed is decided when records are loaded into the tree.

use std::path::Path;

use serde::Serialize;

use crate::category::VolumeRecord;
use crate::error::{SourceError, SourceResult};

/// Line-level counters for a volume listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VolumeReport {
    /// Non-blank lines seen.
    pub lines: usize,
    /// Lines without an identifier and a bracketed call-number list.
    pub unparseable: usize,
    /// Records produced.
    pub records: usize,
}

/// Category part of a single call number, e.g. `QH81` for `'QH81 .W68'`.
pub fn call_number_category(call_number: &str) -> Option<&str> {
    let unquoted = call_number
        .trim()
        .trim_matches(|c: char| c == '\'' || c == '"')
        .trim();
    let category = unquoted.split('.').next().unwrap_or_default().trim();
    (!category.is_empty()).then_some(category)
}

/// Split a listing line into its volume id and call numbers.
pub fn parse_line(line: &str) -> Option<(&str, Vec<&str>)> {
    let open = line.find('[')?;
    let close = line.rfind(']')?;
    if close < open {
        return None;
    }
    let id = line[..open].trim();
    if id.is_empty() {
        return None;
    }
    let call_numbers = line[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    Some((id, call_numbers))
}

/// Parse a whole listing.
pub fn parse_volumes(text: &str) -> (Vec<VolumeRecord>, VolumeReport) {
    let mut report = VolumeReport::default();
    let mut records = Vec::new();

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        report.lines += 1;
        let Some((id, call_numbers)) = parse_line(line) else {
            tracing::debug!(line, "unparseable volume line");
            report.unparseable += 1;
            continue;
        };
        for category in call_numbers.into_iter().filter_map(call_number_category) {
            records.push(VolumeRecord::new(category, id));
        }
    }

    report.records = records.len();
    (records, report)
}

/// Read and parse a listing file.
pub fn read_volumes(path: &Path) -> SourceResult<(Vec<VolumeRecord>, VolumeReport)> {
    let text = std::fs::read_to_string(path).map_err(|e| SourceError::Read {
        kind: "volume",
        path: path.display().to_string(),
        source: e,
    })?;
    let (records, report) = parse_volumes(&text);
    tracing::info!(
        path = %path.display(),
        lines = report.lines,
        unparseable = report.unparseable,
        records = report.records,
        "volume listing read"
    );
    Ok((records, report))
}
