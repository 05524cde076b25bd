//! Summary statistics of a schedule's interval values.

use serde::{Deserialize, Serialize};

use crate::models::{Schedule, INTERVALS_PER_DAY};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStats {
    pub total_positions: usize,
    /// Sum of every interval value of every position.
    pub total_energy: f64,
    /// Total energy spread over one day of quarter hours.
    pub avg_power: f64,
    pub max_power: f64,
    pub min_power: f64,
}

/// Round to two decimals, halves toward positive infinity.
fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

impl ScheduleStats {
    /// Compute statistics; max and min are 0 for a schedule without positions.
    pub fn compute(schedule: &Schedule) -> Self {
        let values = || {
            schedule
                .positions
                .iter()
                .flat_map(|p| p.intervals.as_slice().iter().copied())
        };

        let total_energy: f64 = values().sum();
        let max_power = values().reduce(f64::max).unwrap_or(0.0);
        let min_power = values().reduce(f64::min).unwrap_or(0.0);

        Self {
            total_positions: schedule.positions.len(),
            total_energy: round2(total_energy),
            avg_power: round2(total_energy / INTERVALS_PER_DAY as f64),
            max_power: round2(max_power),
            min_power: round2(min_power),
        }
    }
}
