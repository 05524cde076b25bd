//! Bulk-fill templates for position intervals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Intervals;

/// Deterministic 96-value generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalTemplate {
    /// Constant 50 MW.
    #[serde(alias = "flat50")]
    Flat,
    /// 100 MW from 08:00 through the 20:xx hour, 20 MW otherwise.
    Peak,
    /// 80 MW from 22:00 through the 06:xx hour, 10 MW otherwise.
    Valley,
    /// All zero.
    Clear,
}

impl IntervalTemplate {
    pub const ALL: [IntervalTemplate; 4] = [
        IntervalTemplate::Flat,
        IntervalTemplate::Peak,
        IntervalTemplate::Valley,
        IntervalTemplate::Clear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalTemplate::Flat => "flat",
            IntervalTemplate::Peak => "peak",
            IntervalTemplate::Valley => "valley",
            IntervalTemplate::Clear => "clear",
        }
    }

    /// Value at quarter-hour `index`.
    pub fn value_at(&self, index: usize) -> f64 {
        let hour = index / 4;
        match self {
            IntervalTemplate::Flat => 50.0,
            IntervalTemplate::Peak => {
                if (8..=20).contains(&hour) {
                    100.0
                } else {
                    20.0
                }
            }
            IntervalTemplate::Valley => {
                if hour >= 22 || hour <= 6 {
                    80.0
                } else {
                    10.0
                }
            }
            IntervalTemplate::Clear => 0.0,
        }
    }

    pub fn generate(&self) -> Intervals {
        Intervals::from_fn(|i| self.value_at(i))
    }
}

impl fmt::Display for IntervalTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flat" | "flat50" => Ok(Self::Flat),
            "peak" => Ok(Self::Peak),
            "valley" => Ok(Self::Valley),
            "clear" => Ok(Self::Clear),
            _ => Err(format!("Unknown template: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_and_clear() {
        assert!(IntervalTemplate::Flat
            .generate()
            .as_slice()
            .iter()
            .all(|v| *v == 50.0));
        assert!(IntervalTemplate::Clear.generate().is_all_zero());
    }

    #[test]
    fn test_peak_boundaries() {
        let peak = IntervalTemplate::Peak.generate();
        assert_eq!(peak.get(8), Some(20.0)); // 02:00
        assert_eq!(peak.get(31), Some(20.0)); // 07:45
        assert_eq!(peak.get(32), Some(100.0)); // 08:00
        assert_eq!(peak.get(48), Some(100.0)); // 12:00
        assert_eq!(peak.get(83), Some(100.0)); // 20:45
        assert_eq!(peak.get(84), Some(20.0)); // 21:00
    }

    #[test]
    fn test_valley_boundaries() {
        let valley = IntervalTemplate::Valley.generate();
        assert_eq!(valley.get(0), Some(80.0));
        assert_eq!(valley.get(27), Some(80.0)); // 06:45
        assert_eq!(valley.get(28), Some(10.0)); // 07:00
        assert_eq!(valley.get(87), Some(10.0)); // 21:45
        assert_eq!(valley.get(88), Some(80.0)); // 22:00
        assert_eq!(valley.get(95), Some(80.0));
    }

    #[test]
    fn test_parse_template_names() {
        assert_eq!(
            "flat50".parse::<IntervalTemplate>().unwrap(),
            IntervalTemplate::Flat
        );
        assert_eq!(
            "PEAK".parse::<IntervalTemplate>().unwrap(),
            IntervalTemplate::Peak
        );
        assert!("ramp".parse::<IntervalTemplate>().is_err());
        for template in IntervalTemplate::ALL {
            assert_eq!(
                template.to_string().parse::<IntervalTemplate>().unwrap(),
                template
            );
        }
    }
}
