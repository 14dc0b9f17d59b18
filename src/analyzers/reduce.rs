use crate::analyzers::aggregate::Aggregator;
use crate::analyzers::classify::{Lift, Sex, WeightClass};
use crate::analyzers::types::{LiftTable, Metadata, OrderedMap, PercentileTable, WeightClassTable};
use crate::config::BucketConfig;
use crate::stats::summarize;
use tracing::debug;

/// Summarizes every lift whose series has at least `min_samples` values.
fn lift_table<'s>(
    series: impl Fn(Lift) -> &'s [f64],
    min_samples: usize,
    percentiles: &[u8],
) -> LiftTable {
    let mut table = LiftTable::new();
    for lift in Lift::ALL {
        let values = series(lift);
        if values.len() < min_samples {
            continue;
        }
        let mut sorted = values.to_vec();
        table.insert(lift.key(), summarize(&mut sorted, percentiles));
    }
    table
}

/// Builds the table for one weight class, or `None` when no lift reached the
/// all-ages minimum.
fn weight_class_table(
    agg: &Aggregator<'_>,
    config: &BucketConfig,
    sex: Sex,
    class: WeightClass,
) -> Option<WeightClassTable> {
    let all_ages = lift_table(
        |lift| agg.series(sex, class, lift),
        config.min_samples_all_ages,
        &config.percentiles,
    );
    if all_ages.is_empty() {
        return None;
    }

    let by_age = config
        .age_brackets
        .iter()
        .enumerate()
        .filter_map(|(index, bracket)| {
            let lifts = lift_table(
                |lift| agg.age_series(sex, class, index, lift),
                config.min_samples_by_age,
                &config.percentiles,
            );
            (!lifts.is_empty()).then(|| (bracket.name.clone(), lifts))
        })
        .collect::<OrderedMap<_>>();

    Some(WeightClassTable { all_ages, by_age })
}

/// Reduces the collected series of one sex, in configured class order
/// followed by the open-ended class.
fn sex_table(agg: &Aggregator<'_>, sex: Sex) -> OrderedMap<WeightClassTable> {
    let config = agg.config();
    let thresholds = match sex {
        Sex::Male => &config.male_weight_classes,
        Sex::Female => &config.female_weight_classes,
    };

    let mut table = OrderedMap::new();
    for class in (0..=thresholds.len()).map(WeightClass) {
        let label = class.label(thresholds);
        match weight_class_table(agg, config, sex, class) {
            Some(wc) => table.insert(label, wc),
            None => debug!(%sex, weight_class = %label, "Weight class below sample minimum"),
        }
    }
    table
}

/// Computes the percentile table from an aggregator.
///
/// Buckets under the sample minimums are left out rather than zero-filled.
pub fn build_table(agg: &Aggregator<'_>) -> PercentileTable {
    let config = agg.config();

    PercentileTable {
        metadata: Metadata::new(agg.lifter_count(), &config.percentiles),
        male: sex_table(agg, Sex::Male),
        female: sex_table(agg, Sex::Female),
    }
}
