//! Repository trait for the schedule blob.
//!
//! The whole schedule store is persisted as one JSON object mapping
//! balance-group id to schedule. Implementations only decide where that blob
//! lives; encoding and decoding are shared here so every backend agrees on
//! the layout.
//!
//! - [`error`]: Error types for repository operations

pub mod error;

use async_trait::async_trait;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::models::ScheduleMap;

/// Result of reading the persisted blob.
///
/// Absent and malformed entries are kept apart so callers can log them
/// differently, even though both hydrate an empty store.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// No entry has been written yet.
    Absent,
    /// An entry exists but does not decode as a schedule map.
    Malformed(String),
    Loaded(ScheduleMap),
}

impl LoadOutcome {
    /// The loaded map, or an empty one for absent and malformed entries.
    pub fn into_schedules(self) -> ScheduleMap {
        match self {
            LoadOutcome::Loaded(map) => map,
            LoadOutcome::Absent | LoadOutcome::Malformed(_) => ScheduleMap::new(),
        }
    }
}

/// Persistence adapter for the schedule store.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Check if the storage backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Read the persisted blob.
    ///
    /// # Returns
    /// * `Ok(LoadOutcome)` - absent, malformed or loaded content
    /// * `Err(RepositoryError)` - if the storage itself could not be accessed
    async fn load(&self) -> RepositoryResult<LoadOutcome>;

    /// Overwrite the persisted blob with the full schedule map.
    async fn save(&self, schedules: &ScheduleMap) -> RepositoryResult<()>;

    /// Remove the persisted blob. Succeeds when nothing was stored.
    async fn erase(&self) -> RepositoryResult<()>;

    /// Human-readable location of the blob, for logs.
    fn location(&self) -> String;
}

/// Encode a schedule map in the persisted layout.
pub fn encode_schedules(schedules: &ScheduleMap) -> RepositoryResult<String> {
    serde_json::to_string(schedules).map_err(RepositoryError::from)
}

/// Decode raw blob content. `None` means no entry exists.
pub fn decode_schedules(raw: Option<&str>) -> LoadOutcome {
    match raw {
        None => LoadOutcome::Absent,
        Some(content) => match serde_json::from_str::<ScheduleMap>(content) {
            Ok(map) => LoadOutcome::Loaded(map),
            Err(e) => LoadOutcome::Malformed(e.to_string()),
        },
    }
}
