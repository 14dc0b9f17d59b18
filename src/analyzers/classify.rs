//! Maps raw record fields to bucket keys.

use crate::config::AgeBracket;
use std::fmt;

/// Competition sex category. Only `M` and `F` entries are bucketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            s if s.eq_ignore_ascii_case("m") => Some(Sex::Male),
            s if s.eq_ignore_ascii_case("f") => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The three competition lifts, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lift {
    Squat,
    Bench,
    Deadlift,
}

impl Lift {
    pub const ALL: [Lift; 3] = [Lift::Squat, Lift::Bench, Lift::Deadlift];

    pub fn key(self) -> &'static str {
        match self {
            Lift::Squat => "squat",
            Lift::Bench => "bench",
            Lift::Deadlift => "deadlift",
        }
    }
}

/// Index into the configured class list; `thresholds.len()` is the open-ended
/// super heavyweight class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeightClass(pub usize);

impl WeightClass {
    /// Human label: the threshold itself (`"83"`), or `"<max>+"` for the top class.
    pub fn label(self, thresholds: &[f64]) -> String {
        match thresholds.get(self.0) {
            Some(limit) => format!("{limit}"),
            None => format!("{}+", thresholds.last().copied().unwrap_or_default()),
        }
    }
}

/// Smallest configured class threshold at or above `bodyweight`.
pub fn weight_class(bodyweight: f64, thresholds: &[f64]) -> WeightClass {
    WeightClass(
        thresholds
            .iter()
            .position(|limit| bodyweight <= *limit)
            .unwrap_or(thresholds.len()),
    )
}

/// Index of the first bracket containing `age`.
pub fn age_bracket(age: f64, brackets: &[AgeBracket]) -> Option<usize> {
    brackets.iter().position(|b| b.contains(age))
}

/// Parses an optional age cell. Blank or unparseable ages have no bracket.
pub fn parse_age(raw: Option<&str>) -> Option<f64> {
    parse_number(raw?)
}

/// Parses a best-attempt cell. Failed attempts are recorded as negative
/// numbers and, like blanks, zeros and garbage, count as no lift.
pub fn parse_lift(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.starts_with('-') {
        return None;
    }
    parse_number(raw).filter(|v| *v > 0.0)
}

pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BucketConfig;

    #[test]
    fn test_sex_parse() {
        assert_eq!(Sex::parse("M"), Some(Sex::Male));
        assert_eq!(Sex::parse("f"), Some(Sex::Female));
        assert_eq!(Sex::parse("Mx"), None);
        assert_eq!(Sex::parse(""), None);
        assert_eq!(Sex::Female.to_string(), "female");
    }

    #[test]
    fn test_weight_class_boundaries() {
        let classes = BucketConfig::default().male_weight_classes;

        assert_eq!(weight_class(40.0, &classes), WeightClass(0));
        assert_eq!(weight_class(59.0, &classes), WeightClass(0));
        assert_eq!(weight_class(59.01, &classes), WeightClass(1));
        assert_eq!(weight_class(140.0, &classes), WeightClass(7));
        assert_eq!(weight_class(140.5, &classes), WeightClass(8));
    }

    #[test]
    fn test_weight_class_labels() {
        let classes = BucketConfig::default().female_weight_classes;

        assert_eq!(weight_class(51.2, &classes).label(&classes), "52");
        assert_eq!(weight_class(130.0, &classes).label(&classes), "100+");
        assert_eq!(WeightClass(0).label(&[52.5, 60.0]), "52.5");
    }

    #[test]
    fn test_age_bracket_lookup() {
        let brackets = BucketConfig::default().age_brackets;
        let name = |age: f64| age_bracket(age, &brackets).map(|i| brackets[i].name.as_str());

        assert_eq!(name(0.0), Some("junior"));
        assert_eq!(name(23.0), Some("junior"));
        assert_eq!(name(24.0), Some("open"));
        assert_eq!(name(45.0), Some("masters_40"));
        assert_eq!(name(59.0), Some("masters_50"));
        assert_eq!(name(60.0), Some("masters_60"));
        assert_eq!(name(85.0), Some("masters_70"));
        // Fractional ages between two inclusive ranges fall through.
        assert_eq!(name(23.5), None);
        assert_eq!(name(-1.0), None);
    }

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age(Some("31")), Some(31.0));
        assert_eq!(parse_age(Some("17.5")), Some(17.5));
        assert_eq!(parse_age(Some("")), None);
        assert_eq!(parse_age(Some("unknown")), None);
        assert_eq!(parse_age(None), None);
    }

    #[test]
    fn test_parse_lift() {
        assert_eq!(parse_lift(Some("182.5")), Some(182.5));
        assert_eq!(parse_lift(Some("-200")), None);
        assert_eq!(parse_lift(Some("0")), None);
        assert_eq!(parse_lift(Some("")), None);
        assert_eq!(parse_lift(Some("abc")), None);
        assert_eq!(parse_lift(Some("inf")), None);
        assert_eq!(parse_lift(None), None);
    }

    #[test]
    fn test_lift_output_order() {
        let keys: Vec<_> = Lift::ALL.iter().map(|l| l.key()).collect();
        assert_eq!(keys, vec!["squat", "bench", "deadlift"]);
    }
}
