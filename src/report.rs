// src/report.rs
// =============================================================================
// Exporting match results.
//
// - CSV: header row, then one row per match. Every row carries the same
//   export timestamp (the moment the export was made, not when the match
//   was found).
// - JSON: the match records as a pretty-printed array.
// =============================================================================

use chrono::{DateTime, Local};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::crawl::MatchRecord;

pub const CSV_HEADER: [&str; 4] = ["Source URL", "Match Type", "Match Context", "Timestamp"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Writes one CSV row, quoting fields that need it
fn write_row<W: Write>(w: &mut W, row: &[&str]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        }
        first = false;

        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

// Writes all records as CSV, stamped with `exported_at`
pub fn write_csv<W: Write>(mut w: W, records: &[MatchRecord], exported_at: DateTime<Local>) -> io::Result<()> {
    let timestamp = exported_at.format(TIMESTAMP_FORMAT).to_string();

    write_row(&mut w, &CSV_HEADER)?;
    for record in records {
        write_row(
            &mut w,
            &[
                record.source_url.as_str(),
                record.match_type.label(),
                record.context.as_str(),
                timestamp.as_str(),
            ],
        )?;
    }
    w.flush()
}

/// `crawler_results_YYYYmmdd_HHMMSS.csv`
pub fn default_csv_file_name(at: DateTime<Local>) -> String {
    format!("crawler_results_{}.csv", at.format(FILE_STAMP_FORMAT))
}

// A directory target gets the default file name inside it
pub fn resolve_csv_path(target: &Path, at: DateTime<Local>) -> PathBuf {
    if target.is_dir() {
        target.join(default_csv_file_name(at))
    } else {
        target.to_path_buf()
    }
}

pub fn to_json(records: &[MatchRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}
