//! Extraction of the CSV payload from the OpenPowerlifting zip archive.

use anyhow::{Context, Result, anyhow};
use std::io::{Cursor, Read};
use tracing::info;
use zip::ZipArchive;

const MAX_SIZE_HINT: u64 = 512 << 20;

/// Preallocation for an entry whose header declares `declared` bytes. The
/// header is untrusted, so the hint is capped.
fn size_hint(declared: u64) -> usize {
    declared.min(MAX_SIZE_HINT) as usize
}

/// A CSV file pulled out of the archive (or read directly from disk).
#[derive(Debug)]
pub struct CsvPayload {
    pub name: String,
    pub data: Vec<u8>,
}

/// Picks the CSV entry to process: the main `openpowerlifting*.csv` export
/// if present, otherwise the first CSV of any name.
fn select_entry<S: AsRef<str>>(names: &[S]) -> Option<&str> {
    let mut csvs = names
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| name.ends_with(".csv"));

    csvs.clone()
        .find(|name| name.to_lowercase().contains("openpowerlifting"))
        .or_else(|| csvs.next())
}

/// Decompresses the selected CSV entry from zip `bytes`.
///
/// # Errors
///
/// Returns an error if the bytes are not a zip archive or contain no CSV.
pub fn extract_csv(bytes: &[u8]) -> Result<CsvPayload> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).context("opening zip archive")?;

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let name = select_entry(&names)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("No CSV file found in the archive"))?;

    info!(entry = %name, "Extracting CSV from archive");

    let mut file = archive
        .by_name(&name)
        .with_context(|| format!("reading archive entry '{name}'"))?;
    let mut data = Vec::with_capacity(size_hint(file.size()));
    file.read_to_end(&mut data)
        .with_context(|| format!("decompressing '{name}'"))?;

    Ok(CsvPayload { name, data })
}

/// Turns raw source bytes into a CSV payload. Sources named `*.csv` are
/// taken as-is; anything else is treated as a zip archive.
pub fn load_csv(source_name: &str, bytes: &[u8]) -> Result<CsvPayload> {
    if source_name.to_lowercase().ends_with(".csv") {
        return Ok(CsvPayload {
            name: source_name.to_string(),
            data: bytes.to_vec(),
        });
    }
    extract_csv(bytes)
}
