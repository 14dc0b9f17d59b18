//! Bucketing configuration: weight classes, age brackets, percentiles and
//! minimum sample sizes.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// OpenPowerlifting bulk export.
pub const OPL_URL: &str =
    "https://openpowerlifting.gitlab.io/opl-csv/files/openpowerlifting-latest.zip";

/// An inclusive age range mapped to a bracket name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBracket {
    pub min: f64,
    pub max: f64,
    pub name: String,
}

impl AgeBracket {
    fn new(min: f64, max: f64, name: &str) -> Self {
        Self {
            min,
            max,
            name: name.to_string(),
        }
    }

    pub fn contains(&self, age: f64) -> bool {
        self.min <= age && age <= self.max
    }
}

/// Everything that shapes the percentile table.
///
/// Stored as a plain JSON object on disk; absent fields keep their defaults:
/// ```json
/// {
///   "male_weight_classes": [59, 66, 74, 83, 93, 105, 120, 140],
///   "min_samples_all_ages": 100
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketConfig {
    /// Upper bounds in kg, ascending. Heavier lifters land in `<last>+`.
    pub male_weight_classes: Vec<f64>,
    pub female_weight_classes: Vec<f64>,
    /// Checked in order, first match wins.
    pub age_brackets: Vec<AgeBracket>,
    pub percentiles: Vec<u8>,
    pub min_samples_all_ages: usize,
    pub min_samples_by_age: usize,
    /// Rows between progress log lines.
    pub progress_interval: u64,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            male_weight_classes: vec![59.0, 66.0, 74.0, 83.0, 93.0, 105.0, 120.0, 140.0],
            female_weight_classes: vec![47.0, 52.0, 57.0, 63.0, 69.0, 76.0, 84.0, 100.0],
            age_brackets: vec![
                AgeBracket::new(0.0, 23.0, "junior"),
                AgeBracket::new(24.0, 39.0, "open"),
                AgeBracket::new(40.0, 49.0, "masters_40"),
                AgeBracket::new(50.0, 59.0, "masters_50"),
                AgeBracket::new(60.0, 69.0, "masters_60"),
                AgeBracket::new(70.0, 999.0, "masters_70"),
            ],
            percentiles: vec![5, 10, 20, 30, 40, 50, 60, 70, 80, 90, 95, 99],
            min_samples_all_ages: 50,
            min_samples_by_age: 30,
            progress_interval: 100_000,
        }
    }
}

impl BucketConfig {
    /// Loads and validates the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading config '{path}'"))?;
        let config: BucketConfig =
            serde_json::from_str(&content).with_context(|| format!("parsing config '{path}'"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (sex, classes) in [
            ("male", &self.male_weight_classes),
            ("female", &self.female_weight_classes),
        ] {
            if classes.is_empty() {
                bail!("{sex} weight classes must not be empty");
            }
            if classes.iter().any(|c| !c.is_finite()) {
                bail!("{sex} weight classes must be finite numbers");
            }
            if classes.windows(2).any(|w| w[0] >= w[1]) {
                bail!("{sex} weight classes must be strictly ascending: {classes:?}");
            }
        }

        for bracket in &self.age_brackets {
            if bracket.min > bracket.max {
                bail!(
                    "age bracket '{}' has min {} above max {}",
                    bracket.name,
                    bracket.min,
                    bracket.max
                );
            }
        }

        if self.percentiles.is_empty() {
            bail!("at least one percentile is required");
        }
        if let Some(p) = self.percentiles.iter().find(|p| **p > 100) {
            bail!("percentile {p} is outside 0..=100");
        }
        if self.min_samples_all_ages == 0 || self.min_samples_by_age == 0 {
            bail!("minimum sample sizes must be at least 1");
        }

        Ok(())
    }
}
