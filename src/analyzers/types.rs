//! Data types of the generated percentile table.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// String-keyed map that serializes entries in insertion order.
///
/// Weight classes, age brackets and percentiles all have a natural order
/// that a sorted map would scramble (`"105"` before `"59"`).
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.0.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.0.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

/// Sample size and percentile values for one lift in one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiftStats {
    pub count: usize,
    pub percentiles: OrderedMap<f64>,
}

/// Lift name to statistics, only for lifts that met the sample minimum.
pub type LiftTable = OrderedMap<LiftStats>;

/// Statistics for one weight class of one sex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightClassTable {
    pub all_ages: LiftTable,
    pub by_age: OrderedMap<LiftTable>,
}

/// Provenance block at the top of the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub source: String,
    pub url: String,
    pub lifter_count: u64,
    pub description: String,
    pub units: String,
    pub percentiles: Vec<u8>,
    pub generated_at: DateTime<Utc>,
}

impl Metadata {
    pub fn new(lifter_count: u64, percentiles: &[u8]) -> Self {
        Self {
            source: "OpenPowerlifting".to_string(),
            url: "https://www.openpowerlifting.org".to_string(),
            lifter_count,
            description: "Percentile data from competitive powerlifting meets".to_string(),
            units: "kg".to_string(),
            percentiles: percentiles.to_vec(),
            generated_at: Utc::now(),
        }
    }
}

/// The complete artifact written to disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileTable {
    pub metadata: Metadata,
    pub male: OrderedMap<WeightClassTable>,
    pub female: OrderedMap<WeightClassTable>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ordered_map_keeps_insertion_order() {
        let mut map = OrderedMap::new();
        map.insert("59", 1);
        map.insert("105", 2);
        map.insert("140+", 3);

        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"59":1,"105":2,"140+":3}"#
        );
        assert_eq!(map.get("105"), Some(&2));
        assert_eq!(map.get("66"), None);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_lift_stats_shape() {
        let stats = LiftStats {
            count: 64,
            percentiles: [("5", 100.0), ("50", 150.5)].into_iter().collect(),
        };

        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({"count": 64, "percentiles": {"5": 100.0, "50": 150.5}})
        );
    }

    #[test]
    fn test_metadata_fields() {
        let metadata = Metadata::new(1234, &[5, 50, 95]);
        let value = serde_json::to_value(&metadata).unwrap();

        assert_eq!(value["source"], "OpenPowerlifting");
        assert_eq!(value["units"], "kg");
        assert_eq!(value["lifter_count"], 1234);
        assert_eq!(value["percentiles"], json!([5, 50, 95]));
        assert!(value["generated_at"].is_string());
    }
}
