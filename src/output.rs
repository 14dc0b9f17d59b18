//! Persistence and reporting of the generated table.
//!
//! Supports JSON on disk (pretty or compact), a gzip companion file, and an
//! optional S3 upload.

pub mod s3;

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::PercentileTable;

/// Weight-class counts of a table, per sex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub male_weight_classes: usize,
    pub female_weight_classes: usize,
}

impl Summary {
    pub fn of(table: &PercentileTable) -> Self {
        Self {
            male_weight_classes: table.male.len(),
            female_weight_classes: table.female.len(),
        }
    }

    /// Reads the counts from a table previously written to disk.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let count = |sex: &str| {
            value[sex]
                .as_object()
                .map(|classes| classes.len())
                .with_context(|| format!("table has no '{sex}' object"))
        };
        Ok(Self {
            male_weight_classes: count("male")?,
            female_weight_classes: count("female")?,
        })
    }

    pub fn log(&self) {
        info!(weight_classes = self.male_weight_classes, "Male");
        info!(weight_classes = self.female_weight_classes, "Female");
    }
}

/// Serializes the table to JSON bytes; pretty output uses two-space indents.
pub fn to_json(table: &PercentileTable, pretty: bool) -> Result<Vec<u8>> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(table)?
    } else {
        serde_json::to_vec(table)?
    };
    Ok(bytes)
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Writes the table as JSON to `path`, creating parent directories.
///
/// Returns the number of bytes written.
pub fn write_table(path: &Path, table: &PercentileTable, pretty: bool) -> Result<u64> {
    create_parent(path)?;
    let bytes = to_json(table, pretty)?;

    let mut writer = BufWriter::new(
        File::create(path).with_context(|| format!("creating '{}'", path.display()))?,
    );
    writer.write_all(&bytes)?;
    writer.flush()?;

    debug!(path = %path.display(), bytes = bytes.len(), "Table written");
    Ok(bytes.len() as u64)
}

/// Writes a gzip-compressed copy of the compact JSON to `path`.
pub fn write_gzip(path: &Path, table: &PercentileTable) -> Result<u64> {
    create_parent(path)?;
    let bytes = to_json(table, false)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&bytes)?;
    let compressed = encoder.finish()?;

    fs::write(path, &compressed).with_context(|| format!("writing '{}'", path.display()))?;
    debug!(path = %path.display(), bytes = compressed.len(), "Gzip copy written");
    Ok(compressed.len() as u64)
}

/// Path of the gzip companion: `table.json` becomes `table.json.gz`.
pub fn gzip_path(path: &Path) -> std::path::PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    name.into()
}
