//! # CSV Export
//!
//! Tabular export of evaluation results. A single evaluation becomes a
//! header row of the report labels and one data row; a project becomes one
//! row per sample with a leading `Sample` column.
//!
//! ## Example
//!
//! ```rust
//! use strength_core::calculations::evaluate;
//! use strength_core::export::{parse_csv, to_csv};
//!
//! let result = evaluate(68.0, 132.0, 175.0, 50.0).unwrap();
//! let csv = to_csv(&result).unwrap();
//! assert!(csv.starts_with("Core Diameter (mm),Core Length (mm)"));
//!
//! let pairs = parse_csv(&csv).unwrap();
//! assert_eq!(pairs, result.report_pairs());
//! ```

use csv::{ReaderBuilder, Writer};
use tracing::info;

use crate::calculations::EvaluationResult;
use crate::errors::{CalcError, CalcResult};
use crate::report::REPORT_LABELS;

const FORMAT: &str = "CSV";

fn csv_error(e: impl ToString) -> CalcError {
    CalcError::export_failed(FORMAT, e.to_string())
}

/// Export one evaluation as CSV text (header + one row).
pub fn to_csv(result: &EvaluationResult) -> CalcResult<String> {
    let mut wtr = Writer::from_writer(Vec::new());

    wtr.write_record(REPORT_LABELS).map_err(csv_error)?;
    let values: Vec<String> = result.report_pairs().into_iter().map(|(_, v)| v).collect();
    wtr.write_record(&values).map_err(csv_error)?;

    finish(wtr)
}

/// Export several labeled evaluations, one row each.
pub fn to_csv_rows(rows: &[(&str, EvaluationResult)]) -> CalcResult<String> {
    let mut wtr = Writer::from_writer(Vec::new());

    let mut header = vec!["Sample"];
    header.extend(REPORT_LABELS);
    wtr.write_record(&header).map_err(csv_error)?;

    for (label, result) in rows {
        let mut record = vec![label.to_string()];
        record.extend(result.report_pairs().into_iter().map(|(_, v)| v));
        wtr.write_record(&record).map_err(csv_error)?;
    }

    let text = finish(wtr)?;
    info!(rows = rows.len(), "exported project CSV");
    Ok(text)
}

fn finish(wtr: Writer<Vec<u8>>) -> CalcResult<String> {
    let bytes = wtr.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}

/// Parse a single-evaluation CSV export back into label/value pairs.
///
/// Expects exactly one header row and one data row of equal width.
pub fn parse_csv(text: &str) -> CalcResult<Vec<(String, String)>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = rdr.headers().map_err(csv_error)?.clone();

    let mut records = rdr.records();
    let row = match records.next() {
        Some(record) => record.map_err(csv_error)?,
        None => return Err(csv_error("no data row")),
    };
    if records.next().is_some() {
        return Err(csv_error("expected a single data row"));
    }

    Ok(headers
        .iter()
        .zip(row.iter())
        .map(|(label, value)| (label.to_string(), value.to_string()))
        .collect())
}
