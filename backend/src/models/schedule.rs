//! Schedule documents and their positions.
//!
//! A [`Schedule`] is the declared energy plan of one balance group for one
//! day. Each [`SchedulePosition`] carries exactly [`INTERVALS_PER_DAY`]
//! quarter-hour values; [`Intervals`] enforces that length both when built in
//! code and when deserialized from a persisted blob.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::reference::SelectionContext;
use super::time::{day_period, format_timestamp};

/// Quarter-hour intervals in one schedule day.
pub const INTERVALS_PER_DAY: usize = 96;

/// Default process and business type for new documents.
pub const DEFAULT_TYPE_CODE: &str = "A01";

/// Default measurement unit of a position (megawatts).
pub const DEFAULT_MEASUREMENT_UNIT: &str = "MAW";

/// Persisted store layout: balance-group id to schedule, ordered by key.
pub type ScheduleMap = BTreeMap<String, Schedule>;

/// Errors raised when constructing schedule values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleModelError {
    #[error("expected {expected} interval values, got {actual}")]
    IntervalCount { expected: usize, actual: usize },

    #[error("interval index {index} out of range (0..{len})")]
    IntervalIndex { index: usize, len: usize },
}

/// Fixed-length series of quarter-hour power values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Intervals(Vec<f64>);

impl Intervals {
    /// All-zero series.
    pub fn zeros() -> Self {
        Self::filled(0.0)
    }

    pub fn filled(value: f64) -> Self {
        Self(vec![value; INTERVALS_PER_DAY])
    }

    /// Build a series from a per-index generator.
    pub fn from_fn(f: impl FnMut(usize) -> f64) -> Self {
        Self((0..INTERVALS_PER_DAY).map(f).collect())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn set(&mut self, index: usize, value: f64) -> Result<(), ScheduleModelError> {
        let len = self.0.len();
        let slot = self
            .0
            .get_mut(index)
            .ok_or(ScheduleModelError::IntervalIndex { index, len })?;
        *slot = value;
        Ok(())
    }

    pub fn is_all_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl Default for Intervals {
    fn default() -> Self {
        Self::zeros()
    }
}

impl TryFrom<Vec<f64>> for Intervals {
    type Error = ScheduleModelError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        if values.len() != INTERVALS_PER_DAY {
            return Err(ScheduleModelError::IntervalCount {
                expected: INTERVALS_PER_DAY,
                actual: values.len(),
            });
        }
        Ok(Self(values))
    }
}

impl From<Intervals> for Vec<f64> {
    fn from(intervals: Intervals) -> Self {
        intervals.0
    }
}

/// One line item of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePosition {
    pub id: String,
    pub position_id: String,
    pub business_type: String,
    pub in_party: String,
    pub out_party: String,
    pub in_area: String,
    pub out_area: String,
    pub measurement_unit: String,
    pub intervals: Intervals,
    pub is_active: bool,
}

impl SchedulePosition {
    /// A zero-filled position whose parties and areas come from `ctx`.
    pub fn new(id: impl Into<String>, label: impl Into<String>, ctx: &SelectionContext) -> Self {
        Self {
            id: id.into(),
            position_id: label.into(),
            business_type: DEFAULT_TYPE_CODE.to_string(),
            in_party: ctx.balance_group_eic.clone(),
            out_party: ctx.tso_eic.clone(),
            in_area: ctx.country_code.clone(),
            out_area: ctx.country_code.clone(),
            measurement_unit: DEFAULT_MEASUREMENT_UNIT.to_string(),
            intervals: Intervals::zeros(),
            is_active: true,
        }
    }
}

/// A day-ahead schedule document for one balance group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub message_id: String,
    pub version: String,
    pub creation_date: String,
    pub sender: String,
    pub receiver: String,
    pub in_domain: String,
    pub out_domain: String,
    pub process_type: String,
    pub business_type: String,
    pub schedule_period_start: String,
    pub schedule_period_end: String,
    pub positions: Vec<SchedulePosition>,
}

impl Schedule {
    /// Synthesize the default schedule for a selection at `now`.
    ///
    /// Identifiers derive from the epoch milliseconds of `now`; the period
    /// covers the local calendar day of `now`.
    pub fn new_default<Tz: TimeZone>(ctx: &SelectionContext, now: &DateTime<Tz>) -> Self {
        let millis = now.timestamp_millis();
        let (start, end) = day_period(now);
        Self {
            id: format!("schedule_{millis}"),
            message_id: format!("SCH_{millis}"),
            version: "1".to_string(),
            creation_date: format_timestamp(now.with_timezone(&Utc)),
            sender: ctx.balance_group_eic.clone(),
            receiver: ctx.tso_eic.clone(),
            in_domain: ctx.country_code.clone(),
            out_domain: ctx.country_code.clone(),
            process_type: DEFAULT_TYPE_CODE.to_string(),
            business_type: DEFAULT_TYPE_CODE.to_string(),
            schedule_period_start: format_timestamp(start),
            schedule_period_end: format_timestamp(end),
            positions: Vec::new(),
        }
    }

    /// Default schedule stamped with the current local time.
    pub fn synthesize(ctx: &SelectionContext) -> Self {
        Self::new_default(ctx, &Local::now())
    }

    pub fn position(&self, id: &str) -> Option<&SchedulePosition> {
        self.positions.iter().find(|p| p.id == id)
    }

    pub fn position_mut(&mut self, id: &str) -> Option<&mut SchedulePosition> {
        self.positions.iter_mut().find(|p| p.id == id)
    }

    /// Next free position identifier derived from `millis`.
    pub fn next_position_id(&self, millis: i64) -> String {
        let mut candidate = millis;
        loop {
            let id = format!("pos_{candidate}");
            if self.position(&id).is_none() {
                return id;
            }
            candidate += 1;
        }
    }
}

/// Partial update of schedule header fields.
///
/// Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleUpdate {
    pub message_id: Option<String>,
    pub version: Option<String>,
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub in_domain: Option<String>,
    pub out_domain: Option<String>,
    pub process_type: Option<String>,
    pub business_type: Option<String>,
    pub schedule_period_start: Option<String>,
    pub schedule_period_end: Option<String>,
    pub positions: Option<Vec<SchedulePosition>>,
}

fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl ScheduleUpdate {
    pub fn apply(self, schedule: &mut Schedule) {
        merge(&mut schedule.message_id, self.message_id);
        merge(&mut schedule.version, self.version);
        merge(&mut schedule.sender, self.sender);
        merge(&mut schedule.receiver, self.receiver);
        merge(&mut schedule.in_domain, self.in_domain);
        merge(&mut schedule.out_domain, self.out_domain);
        merge(&mut schedule.process_type, self.process_type);
        merge(&mut schedule.business_type, self.business_type);
        merge(&mut schedule.schedule_period_start, self.schedule_period_start);
        merge(&mut schedule.schedule_period_end, self.schedule_period_end);
        merge(&mut schedule.positions, self.positions);
    }
}

/// Partial update of a position. The position's `id` is immutable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionUpdate {
    pub position_id: Option<String>,
    pub business_type: Option<String>,
    pub in_party: Option<String>,
    pub out_party: Option<String>,
    pub in_area: Option<String>,
    pub out_area: Option<String>,
    pub measurement_unit: Option<String>,
    pub intervals: Option<Intervals>,
    pub is_active: Option<bool>,
}

impl PositionUpdate {
    pub fn apply(self, position: &mut SchedulePosition) {
        merge(&mut position.position_id, self.position_id);
        merge(&mut position.business_type, self.business_type);
        merge(&mut position.in_party, self.in_party);
        merge(&mut position.out_party, self.out_party);
        merge(&mut position.in_area, self.in_area);
        merge(&mut position.out_area, self.out_area);
        merge(&mut position.measurement_unit, self.measurement_unit);
        merge(&mut position.intervals, self.intervals);
        merge(&mut position.is_active, self.is_active);
    }
}
