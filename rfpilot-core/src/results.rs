//! # S11 Results
//!
//! Parsing and summarizing of the S11 sweep the simulation script writes.
//!
//! ## Format
//! - Comma-delimited text with exactly one header line
//! - Two numeric columns: frequency (GHz) and S11 magnitude (dB)
//! - Values may be in scientific notation (numpy's savetxt default)
//! - The header is skipped without validation; blank lines are ignored
//!
//! The interesting row is the one with the minimum magnitude: the deepest
//! S11 dip marks the best-matched operating frequency.

use crate::error::{results_malformed, results_missing, Error, ErrorKind, Result};
use std::path::Path;

/// Filename the generated simulation script writes its sweep into
pub const RESULTS_FILENAME: &str = "S11_results.csv";

/// One row of the S11 sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultRow {
    pub frequency_ghz: f64,
    pub magnitude_db: f64,
}

/// Parse the results table from file content.
///
/// Any malformed data row fails the whole parse with a `ResultsMalformed`
/// error naming the 1-based line, as does a file with no data rows at all.
pub fn parse_results(content: &str) -> Result<Vec<ResultRow>> {
    let mut rows = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        // Line 1 is the header, skipped without validation.
        if idx == 0 {
            continue;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 2 {
            return Err(results_malformed(
                line_no,
                format!("expected two comma-separated columns, got {}", fields.len()),
            ));
        }

        rows.push(ResultRow {
            frequency_ghz: parse_field(fields[0], line_no)?,
            magnitude_db: parse_field(fields[1], line_no)?,
        });
    }

    if rows.is_empty() {
        return Err(Error::new(
            ErrorKind::ResultsMalformed,
            "no data rows after the header",
        ));
    }

    Ok(rows)
}

fn parse_field(field: &str, line_no: usize) -> Result<f64> {
    let trimmed = field.trim();
    trimmed.parse::<f64>().map_err(|e| {
        results_malformed(line_no, format!("invalid number '{}'", trimmed)).set_source(e)
    })
}

/// Read and parse the results file.
///
/// An absent file is `ResultsMissing`, which callers treat as "no feedback
/// this round" rather than a failure.
pub fn load_results(path: impl AsRef<Path>) -> Result<Vec<ResultRow>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(results_missing(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::from(e)
            .with_operation("results::load")
            .with_context("path", path.display().to_string())
    })?;

    parse_results(&content).map_err(|e| {
        e.with_operation("results::load")
            .with_context("path", path.display().to_string())
    })
}

/// The row with the minimum S11 magnitude.
///
/// Ties resolve to the earliest row, matching the sweep order.
pub fn best_row(rows: &[ResultRow]) -> Option<&ResultRow> {
    rows.iter()
        .min_by(|a, b| a.magnitude_db.total_cmp(&b.magnitude_db))
}

/// The one-line summary sent back to the model after a simulation
pub fn feedback_message(row: &ResultRow) -> String {
    format!(
        "S11 simulation (magnitude dB). Minimum at {} GHz, with {} dB",
        row.frequency_ghz, row.magnitude_db
    )
}
