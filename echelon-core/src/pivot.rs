//! Pivot selection rule for elimination

use serde::{Deserialize, Serialize};

/// How the pivot candidate is chosen within a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotRule {
    #[default]
    /// Largest raw value. A column whose largest value is exactly zero has no
    /// pivot, even when a negative entry sits below it.
    Largest,
    /// Largest absolute value (textbook partial pivoting)
    LargestMagnitude,
}

impl PivotRule {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "largest" | "raw" | "literal" => Some(PivotRule::Largest),
            "magnitude" | "abs" | "largest_magnitude" => Some(PivotRule::LargestMagnitude),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PivotRule::Largest => "largest",
            PivotRule::LargestMagnitude => "magnitude",
        }
    }

    /// Key compared when scanning a column
    pub fn key(&self, value: f64) -> f64 {
        match self {
            PivotRule::Largest => value,
            PivotRule::LargestMagnitude => value.abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(PivotRule::from_str("largest"), Some(PivotRule::Largest));
        assert_eq!(PivotRule::from_str(" RAW "), Some(PivotRule::Largest));
        assert_eq!(PivotRule::from_str("abs"), Some(PivotRule::LargestMagnitude));
        assert_eq!(PivotRule::from_str("Magnitude"), Some(PivotRule::LargestMagnitude));
        assert_eq!(PivotRule::from_str("smallest"), None);
    }

    #[test]
    fn test_default_is_literal() {
        assert_eq!(PivotRule::default(), PivotRule::Largest);
    }

    #[test]
    fn test_key() {
        assert_eq!(PivotRule::Largest.key(-3.0), -3.0);
        assert_eq!(PivotRule::LargestMagnitude.key(-3.0), 3.0);
    }
}
