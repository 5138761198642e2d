//! Stop priority levels and the weighting policy applied to them.
//!
//! Priority influences a tour in two independent ways: the ordinal weight
//! decides the order in which candidates are considered, and the selection
//! bias shrinks the effective distance of urgent stops during the
//! nearest-neighbor scan.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Urgency of a stop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Weight used for the initial descending sort (higher goes first).
    #[inline]
    pub fn ordinal_weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    /// Multiplier applied to the raw distance when comparing candidates.
    /// Lower values make a stop look closer.
    #[inline]
    pub fn selection_bias(self) -> f64 {
        match self {
            Priority::High => 0.8,
            Priority::Medium => 0.9,
            Priority::Low => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when priority text is not one of the three levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPriority(pub String);

impl fmt::Display for UnknownPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown priority {:?}", self.0)
    }
}

impl std::error::Error for UnknownPriority {}

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(UnknownPriority(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_weights() {
        assert_eq!(Priority::High.ordinal_weight(), 3);
        assert_eq!(Priority::Medium.ordinal_weight(), 2);
        assert_eq!(Priority::Low.ordinal_weight(), 1);
    }

    #[test]
    fn test_selection_bias_favours_urgent_stops() {
        assert_eq!(Priority::High.selection_bias(), 0.8);
        assert_eq!(Priority::Medium.selection_bias(), 0.9);
        assert_eq!(Priority::Low.selection_bias(), 1.0);
        assert!(Priority::High.selection_bias() < Priority::Medium.selection_bias());
        assert!(Priority::Medium.selection_bias() < Priority::Low.selection_bias());
    }

    #[test]
    fn test_parse() {
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(" Medium ".parse::<Priority>(), Ok(Priority::Medium));
        assert_eq!("LOW".parse::<Priority>(), Ok(Priority::Low));
        assert_eq!("urgent".parse::<Priority>(), Err(UnknownPriority("urgent".to_string())));
        assert!("".parse::<Priority>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
    }
}
