//! In-memory schedule state container.
//!
//! The store is hydrated once from a [`ScheduleRepository`] and is the
//! authoritative state afterwards. Every mutation re-serializes the whole map
//! through the repository; failures are logged and remembered in
//! [`ScheduleStore::last_persist_error`] but never returned to callers.
//! A failure stays recorded until a later write succeeds, the store is
//! cleared, or [`ScheduleStore::reload`] resynchronizes with the repository.
//!
//! Operations naming a balance group or position that does not exist are
//! no-ops and do not touch the repository.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info, warn};

use crate::db::repository::{LoadOutcome, RepositoryError, ScheduleRepository};
use crate::models::{
    Country, PositionUpdate, Schedule, ScheduleMap, ScheduleModelError, ScheduleUpdate,
    SchedulePosition, SelectionContext,
};
use crate::services::reference_data::ReferenceDataProvider;
use crate::services::templates::IntervalTemplate;

/// Suffix appended to the label of a duplicated position.
pub const COPY_SUFFIX: &str = "_COPY";

pub struct ScheduleStore {
    schedules: ScheduleMap,
    repository: Arc<dyn ScheduleRepository>,
    hierarchy: Vec<Country>,
    last_persist_error: Option<RepositoryError>,
}

impl ScheduleStore {
    /// Build a store and load the persisted blob once.
    ///
    /// Absent, malformed and unreadable blobs all start an empty store.
    pub async fn hydrate(
        repository: Arc<dyn ScheduleRepository>,
        reference: &dyn ReferenceDataProvider,
    ) -> Self {
        let mut store = Self {
            schedules: ScheduleMap::new(),
            repository,
            hierarchy: reference.hierarchy(),
            last_persist_error: None,
        };
        store.reload().await;
        store
    }

    /// Replace the in-memory map with the persisted blob.
    ///
    /// Unsaved in-memory edits are discarded and any recorded write failure
    /// is cleared.
    pub async fn reload(&mut self) {
        let location = self.repository.location();
        self.last_persist_error = None;
        self.schedules = match self.repository.load().await {
            Ok(LoadOutcome::Loaded(map)) => {
                info!("Loaded {} schedule(s) from {}", map.len(), location);
                map
            }
            Ok(LoadOutcome::Absent) => {
                debug!("No persisted schedules at {}", location);
                ScheduleMap::new()
            }
            Ok(LoadOutcome::Malformed(reason)) => {
                warn!("Ignoring malformed schedule blob at {}: {}", location, reason);
                ScheduleMap::new()
            }
            Err(e) => {
                error!("Failed to read schedules from {}: {}", location, e);
                ScheduleMap::new()
            }
        };
    }

    /// Reference hierarchy the store resolves selection contexts from.
    pub fn hierarchy(&self) -> &[Country] {
        &self.hierarchy
    }

    /// Whether `balance_group_id` exists in the reference hierarchy.
    pub fn knows_balance_group(&self, balance_group_id: &str) -> bool {
        self.context_for(balance_group_id).is_some()
    }

    fn context_for(&self, balance_group_id: &str) -> Option<SelectionContext> {
        SelectionContext::resolve(&self.hierarchy, balance_group_id)
    }

    /// Stored schedule, or a freshly synthesized default that is not stored.
    pub fn get(&self, balance_group_id: &str) -> Schedule {
        match self.schedules.get(balance_group_id) {
            Some(schedule) => schedule.clone(),
            None => Schedule::synthesize(&self.context_for(balance_group_id).unwrap_or_default()),
        }
    }

    /// Ids of balance groups with a stored schedule, in key order.
    pub fn balance_group_ids(&self) -> Vec<String> {
        self.schedules.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    /// The most recent failed write, cleared by the next success.
    pub fn last_persist_error(&self) -> Option<&RepositoryError> {
        self.last_persist_error.as_ref()
    }

    /// Merge `update` into the schedule (synthesized if absent) and persist.
    pub async fn update(&mut self, balance_group_id: &str, update: ScheduleUpdate) -> Schedule {
        let schedule = self.entry(balance_group_id);
        update.apply(schedule);
        let result = schedule.clone();
        self.persist().await;
        result
    }

    /// Drop every schedule and erase the persisted blob.
    pub async fn clear(&mut self) {
        self.schedules.clear();
        match self.repository.erase().await {
            Ok(()) => {
                info!("Cleared schedule store at {}", self.repository.location());
                self.last_persist_error = None;
            }
            Err(e) => {
                error!("Failed to erase schedules: {}", e);
                self.last_persist_error = Some(e);
            }
        }
    }

    /// Append a zero-filled position labelled `POS_<n>`. Returns its id.
    pub async fn add_position(&mut self, balance_group_id: &str) -> String {
        let ctx = self.context_for(balance_group_id).unwrap_or_default();
        let millis = Utc::now().timestamp_millis();
        let schedule = self.entry(balance_group_id);
        let id = schedule.next_position_id(millis);
        let label = format!("POS_{}", schedule.positions.len() + 1);
        schedule
            .positions
            .push(SchedulePosition::new(id.clone(), label, &ctx));
        self.persist().await;
        id
    }

    /// Copy a position under a new id. Returns the new id, or `None` when
    /// the source does not exist.
    pub async fn duplicate_position(
        &mut self,
        balance_group_id: &str,
        position_id: &str,
    ) -> Option<String> {
        let millis = Utc::now().timestamp_millis();
        let schedule = self.schedules.get_mut(balance_group_id)?;
        let source = schedule.position(position_id)?;

        let mut copy = source.clone();
        copy.id = schedule.next_position_id(millis);
        copy.position_id = format!("{}{}", source.position_id, COPY_SUFFIX);
        let id = copy.id.clone();
        schedule.positions.push(copy);

        self.persist().await;
        Some(id)
    }

    /// Remove a position. Returns whether anything was removed.
    pub async fn remove_position(&mut self, balance_group_id: &str, position_id: &str) -> bool {
        let Some(schedule) = self.schedules.get_mut(balance_group_id) else {
            return false;
        };
        let before = schedule.positions.len();
        schedule.positions.retain(|p| p.id != position_id);
        if schedule.positions.len() == before {
            return false;
        }
        self.persist().await;
        true
    }

    /// Merge `update` into one position. Returns whether it exists.
    pub async fn update_position(
        &mut self,
        balance_group_id: &str,
        position_id: &str,
        update: PositionUpdate,
    ) -> bool {
        let Some(position) = self.position_mut(balance_group_id, position_id) else {
            return false;
        };
        update.apply(position);
        self.persist().await;
        true
    }

    /// Overwrite one interval value.
    ///
    /// Returns `Ok(false)` when the position does not exist and an error for
    /// an index outside the day.
    pub async fn set_interval(
        &mut self,
        balance_group_id: &str,
        position_id: &str,
        index: usize,
        value: f64,
    ) -> Result<bool, ScheduleModelError> {
        let Some(position) = self.position_mut(balance_group_id, position_id) else {
            return Ok(false);
        };
        position.intervals.set(index, value)?;
        self.persist().await;
        Ok(true)
    }

    /// Fill intervals from `template`, for one position or every position.
    ///
    /// Returns the number of positions rewritten.
    pub async fn apply_template(
        &mut self,
        balance_group_id: &str,
        template: IntervalTemplate,
        position_id: Option<&str>,
    ) -> usize {
        let Some(schedule) = self.schedules.get_mut(balance_group_id) else {
            return 0;
        };
        let intervals = template.generate();

        let mut touched = 0;
        for position in schedule
            .positions
            .iter_mut()
            .filter(|p| position_id.map_or(true, |id| p.id == id))
        {
            position.intervals = intervals.clone();
            touched += 1;
        }

        if touched > 0 {
            debug!(
                "Applied {} template to {} position(s) of {}",
                template, touched, balance_group_id
            );
            self.persist().await;
        }
        touched
    }

    fn entry(&mut self, balance_group_id: &str) -> &mut Schedule {
        let ctx = self.context_for(balance_group_id).unwrap_or_default();
        self.schedules
            .entry(balance_group_id.to_string())
            .or_insert_with(|| Schedule::synthesize(&ctx))
    }

    fn position_mut(
        &mut self,
        balance_group_id: &str,
        position_id: &str,
    ) -> Option<&mut SchedulePosition> {
        self.schedules
            .get_mut(balance_group_id)?
            .position_mut(position_id)
    }

    async fn persist(&mut self) {
        match self.repository.save(&self.schedules).await {
            Ok(()) => {
                debug!(
                    "Persisted {} schedule(s) to {}",
                    self.schedules.len(),
                    self.repository.location()
                );
                self.last_persist_error = None;
            }
            Err(e) if e.is_conflict() => {
                warn!("Schedule store changed underneath us, keeping in-memory state: {}", e);
                self.last_persist_error = Some(e);
            }
            Err(e) => {
                error!("Failed to persist schedules: {}", e);
                self.last_persist_error = Some(e);
            }
        }
    }
}
