///! Two-Line Element text parser
///!
///! Accepts single records ("name / line 1 / line 2") and multi-record 3LE
///! blocks as served by CelesTrak. Malformed records never produce an error;
///! they are skipped and the scan re-synchronizes on the next valid triplet.

use super::types::OrbitalElementSet;

/// Offsets of the catalog number in line 2 (0-indexed, end exclusive)
const CATALOG_ID_START: usize = 2;
const CATALOG_ID_END: usize = 7;

/// Split text into non-empty trimmed lines, accepting CRLF, CR and LF endings
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Parse exactly one record from "name\nline1\nline2"
///
/// Returns `None` if fewer than three non-empty lines are present or if
/// line 2 is too short to hold a catalog number.
pub fn parse_one(text: &str) -> Option<OrbitalElementSet> {
    let lines = normalize_lines(text);
    if lines.len() < 3 {
        return None;
    }

    build_record(lines[0], lines[1], lines[2])
}

/// Parse every well-formed triplet from a 3LE block
pub fn parse_many(text: &str) -> Vec<OrbitalElementSet> {
    let lines = normalize_lines(text);
    let mut records = Vec::new();
    let mut i = 0;

    while i + 2 < lines.len() {
        let (name, line1, line2) = (lines[i], lines[i + 1], lines[i + 2]);

        if line1.starts_with("1 ") && line2.starts_with("2 ") {
            match build_record(name, line1, line2) {
                Some(record) => records.push(record),
                None => tracing::debug!("Skipping TLE with short line 2: {:?}", name),
            }
            i += 3;
        } else {
            // Feeds sometimes omit the name line; slide one line and retry
            i += 1;
        }
    }

    records
}

/// Catalog number from line 2, trimmed
pub fn catalog_id(line2: &str) -> Option<&str> {
    if line2.len() <= CATALOG_ID_END {
        return None;
    }
    line2.get(CATALOG_ID_START..CATALOG_ID_END).map(str::trim)
}

fn build_record(name: &str, line1: &str, line2: &str) -> Option<OrbitalElementSet> {
    let id = catalog_id(line2)?;

    Some(OrbitalElementSet {
        catalog_id: id.to_string(),
        name: name.to_string(),
        line1: line1.to_string(),
        line2: line2.to_string(),
        position: None,
    })
}
