//! CSV parser for OpenPowerlifting competition entries.

use csv::{ErrorKind, ReaderBuilder};
use serde::Deserialize;
use std::io::Read;

/// The columns of one competition entry that the percentile table needs.
///
/// Every field is kept as the raw cell text; missing columns and blank cells
/// are `None`. Interpretation happens during classification.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Sex", default)]
    pub sex: Option<String>,
    #[serde(rename = "Age", default)]
    pub age: Option<String>,
    #[serde(rename = "BodyweightKg", default)]
    pub bodyweight_kg: Option<String>,
    #[serde(rename = "Best3SquatKg", default)]
    pub best3_squat_kg: Option<String>,
    #[serde(rename = "Best3BenchKg", default)]
    pub best3_bench_kg: Option<String>,
    #[serde(rename = "Best3DeadliftKg", default)]
    pub best3_deadlift_kg: Option<String>,
}

/// Iterates the rows of a headed CSV stream.
///
/// Columns are matched by header name, so extra columns and any column order
/// are accepted. Rows may be ragged: missing trailing cells are `None` and
/// cells past the last header are ignored.
pub fn records<R: Read>(reader: R) -> impl Iterator<Item = csv::Result<RawRecord>> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
        .into_deserialize::<RawRecord>()
}

/// Whether a row error should abort the run. Only I/O failures do; a row
/// with invalid UTF-8 or an undecodable cell is skipped.
pub fn is_fatal(err: &csv::Error) -> bool {
    matches!(err.kind(), ErrorKind::Io(_))
}
