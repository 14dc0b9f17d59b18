use crate::analyzers::classify::{
    Lift, Sex, WeightClass, age_bracket, parse_age, parse_lift, parse_number, weight_class,
};
use crate::config::BucketConfig;
use crate::parser::RawRecord;
use serde::Serialize;
use std::collections::HashMap;

/// Why a row never reached a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingBodyweight,
    InvalidBodyweight,
    UnknownSex,
}

/// Outcome of ingesting one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingested {
    /// At least one lift was added.
    Included,
    /// Classified, but every lift cell was blank, failed or invalid.
    NoLifts,
    Skipped(SkipReason),
}

/// Row counters collected while aggregating.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub rows: u64,
    pub included: u64,
    pub no_lifts: u64,
    pub missing_bodyweight: u64,
    pub invalid_bodyweight: u64,
    pub unknown_sex: u64,
    pub malformed: u64,
}

/// All-ages bucket: one weight class of one sex, one lift.
pub type AllAgesKey = (Sex, WeightClass, Lift);
/// Age bucket: as [`AllAgesKey`] plus the index of the age bracket.
pub type ByAgeKey = (Sex, WeightClass, usize, Lift);

/// Accumulates lift values per bucket across all rows.
#[derive(Debug)]
pub struct Aggregator<'a> {
    config: &'a BucketConfig,
    pub(crate) all_ages: HashMap<AllAgesKey, Vec<f64>>,
    pub(crate) by_age: HashMap<ByAgeKey, Vec<f64>>,
    pub(crate) stats: IngestStats,
}

impl<'a> Aggregator<'a> {
    pub fn new(config: &'a BucketConfig) -> Self {
        Self {
            config,
            all_ages: HashMap::new(),
            by_age: HashMap::new(),
            stats: IngestStats::default(),
        }
    }

    pub fn config(&self) -> &BucketConfig {
        self.config
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Number of lifters with at least one recorded lift.
    pub fn lifter_count(&self) -> u64 {
        self.stats.included
    }

    /// Values collected for an all-ages bucket, in ingest order.
    pub fn series(&self, sex: Sex, class: WeightClass, lift: Lift) -> &[f64] {
        self.all_ages
            .get(&(sex, class, lift))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Values collected for an age-bracket bucket, in ingest order.
    pub fn age_series(&self, sex: Sex, class: WeightClass, bracket: usize, lift: Lift) -> &[f64] {
        self.by_age
            .get(&(sex, class, bracket, lift))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Counts a row the CSV reader could not decode.
    pub fn record_malformed(&mut self) {
        self.stats.rows += 1;
        self.stats.malformed += 1;
    }

    /// Classifies one row and appends its valid lifts to the matching buckets.
    pub fn ingest(&mut self, record: &RawRecord) -> Ingested {
        self.stats.rows += 1;

        let outcome = self.classify_and_push(record);
        match outcome {
            Ingested::Included => self.stats.included += 1,
            Ingested::NoLifts => self.stats.no_lifts += 1,
            Ingested::Skipped(SkipReason::MissingBodyweight) => self.stats.missing_bodyweight += 1,
            Ingested::Skipped(SkipReason::InvalidBodyweight) => self.stats.invalid_bodyweight += 1,
            Ingested::Skipped(SkipReason::UnknownSex) => self.stats.unknown_sex += 1,
        }
        outcome
    }

    fn classify_and_push(&mut self, record: &RawRecord) -> Ingested {
        let config = self.config;
        let Some(raw_bodyweight) = record.bodyweight_kg.as_deref().filter(|s| !s.trim().is_empty())
        else {
            return Ingested::Skipped(SkipReason::MissingBodyweight);
        };
        let Some(bodyweight) = parse_number(raw_bodyweight) else {
            return Ingested::Skipped(SkipReason::InvalidBodyweight);
        };
        let Some(sex) = record.sex.as_deref().and_then(Sex::parse) else {
            return Ingested::Skipped(SkipReason::UnknownSex);
        };

        let thresholds = match sex {
            Sex::Male => &config.male_weight_classes,
            Sex::Female => &config.female_weight_classes,
        };
        let class = weight_class(bodyweight, thresholds);
        let bracket = parse_age(record.age.as_deref())
            .and_then(|age| age_bracket(age, &config.age_brackets));

        let mut added = false;
        for lift in Lift::ALL {
            let Some(value) = parse_lift(record.lift(lift)) else {
                continue;
            };

            self.all_ages
                .entry((sex, class, lift))
                .or_default()
                .push(value);
            if let Some(bracket) = bracket {
                self.by_age
                    .entry((sex, class, bracket, lift))
                    .or_default()
                    .push(value);
            }
            added = true;
        }

        if added {
            Ingested::Included
        } else {
            Ingested::NoLifts
        }
    }
}

impl RawRecord {
    /// Raw best-attempt cell for `lift`.
    pub fn lift(&self, lift: Lift) -> Option<&str> {
        match lift {
            Lift::Squat => self.best3_squat_kg.as_deref(),
            Lift::Bench => self.best3_bench_kg.as_deref(),
            Lift::Deadlift => self.best3_deadlift_kg.as_deref(),
        }
    }
}
