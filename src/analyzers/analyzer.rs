use crate::analyzers::aggregate::{Aggregator, IngestStats};
use crate::analyzers::reduce::build_table;
use crate::analyzers::types::PercentileTable;
use crate::config::BucketConfig;
use crate::parser::{is_fatal, records};
use anyhow::{Context, Result};
use std::io::Read;
use tracing::{debug, info, warn};

/// Streams CSV rows from `reader` through the aggregator and reduces the
/// result into a percentile table.
///
/// Rows the CSV reader rejects are counted and skipped; I/O errors abort.
#[tracing::instrument(skip_all)]
pub fn analyze<R: Read>(reader: R, config: &BucketConfig) -> Result<(PercentileTable, IngestStats)> {
    let mut agg = Aggregator::new(config);

    for result in records(reader) {
        match result {
            Ok(record) => {
                agg.ingest(&record);
            }
            Err(e) if is_fatal(&e) => {
                return Err(e).context("reading CSV rows");
            }
            Err(e) => {
                debug!(error = %e, "Skipping malformed row");
                agg.record_malformed();
            }
        }

        let rows = agg.stats().rows;
        if config.progress_interval > 0 && rows % config.progress_interval == 0 {
            info!(rows, "Processed rows");
        }
    }

    let stats = agg.stats().clone();
    info!(
        rows = stats.rows,
        lifters = stats.included,
        no_lifts = stats.no_lifts,
        missing_bodyweight = stats.missing_bodyweight,
        invalid_bodyweight = stats.invalid_bodyweight,
        unknown_sex = stats.unknown_sex,
        "Finished reading rows"
    );
    if stats.malformed > 0 {
        warn!(malformed = stats.malformed, "Some rows could not be parsed");
    }

    info!("Calculating percentiles");
    let table = build_table(&agg);
    Ok((table, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_counts_rows() {
        let csv = "\
Sex,Age,BodyweightKg,Best3SquatKg,Best3BenchKg,Best3DeadliftKg
M,25,80,200,120,240
F,30,60,,-70,150
Mx,30,70,150,100,200
M,40,,180,110,220
M,40,90,-180,,
M,25,80,200
";
        let (table, stats) = analyze(csv.as_bytes(), &BucketConfig::default()).unwrap();

        assert_eq!(stats.rows, 6);
        assert_eq!(stats.included, 3);
        assert_eq!(stats.no_lifts, 1);
        assert_eq!(stats.unknown_sex, 1);
        assert_eq!(stats.missing_bodyweight, 1);
        assert_eq!(stats.malformed, 0);
        assert_eq!(table.metadata.lifter_count, 3);
        // far below the sample minimums
        assert!(table.male.is_empty());
        assert!(table.female.is_empty());
    }

    #[test]
    fn test_analyze_empty_input() {
        let (table, stats) = analyze("".as_bytes(), &BucketConfig::default()).unwrap();
        assert_eq!(stats.rows, 0);
        assert_eq!(table.metadata.lifter_count, 0);
    }
}
