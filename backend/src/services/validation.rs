//! Field-presence validation of schedule documents.
//!
//! Errors are recomputed on every call and returned in a fixed order:
//! header checks first, then each position in list order. There are no
//! numeric-range or cross-position balance checks.

use serde::{Deserialize, Serialize};

use crate::models::Schedule;

/// Validate a schedule, returning human-readable errors in order.
pub fn validate(schedule: &Schedule) -> Vec<String> {
    let mut errors = Vec::new();

    if schedule.sender.is_empty() {
        errors.push("Sender is required".to_string());
    }
    if schedule.receiver.is_empty() {
        errors.push("Receiver is required".to_string());
    }
    if schedule.positions.is_empty() {
        errors.push("At least one position is required".to_string());
    }

    for (index, position) in schedule.positions.iter().enumerate() {
        let n = index + 1;
        if position.position_id.is_empty() {
            errors.push(format!("Position {n}: Position ID is required"));
        }
        if position.business_type.is_empty() {
            errors.push(format!("Position {n}: Business Type is required"));
        }
        if position.in_party.is_empty() {
            errors.push(format!("Position {n}: In Party is required"));
        }
        if position.out_party.is_empty() {
            errors.push(format!("Position {n}: Out Party is required"));
        }
        if position.intervals.is_all_zero() {
            errors.push(format!("Position {n}: No energy values defined"));
        }
    }

    errors
}

/// Validation outcome for one balance group's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub balance_group_id: String,
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn for_schedule(balance_group_id: impl Into<String>, schedule: &Schedule) -> Self {
        let errors = validate(schedule);
        Self {
            balance_group_id: balance_group_id.into(),
            valid: errors.is_empty(),
            errors,
        }
    }
}
