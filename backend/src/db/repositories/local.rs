//! In-memory local repository implementation.
//!
//! Holds the encoded blob as a string, the way browser local storage would,
//! so tests exercise the same JSON round trip as the file backend. Suitable
//! for unit testing and local development.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::repository::{
    decode_schedules, encode_schedules, LoadOutcome, RepositoryError, RepositoryResult,
    ScheduleRepository,
};
use crate::models::ScheduleMap;

/// In-memory local repository.
///
/// Clones share the same underlying blob, which lets tests simulate two
/// sessions writing to one store.
///
/// # Example
/// ```
/// use tso_schedule::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// repo.set_raw("{}");
/// assert_eq!(repo.raw().as_deref(), Some("{}"));
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    blob: Option<String>,
    writes: usize,
    is_healthy: bool,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData {
                blob: None,
                writes: 0,
                is_healthy: true,
            })),
        }
    }

    /// Current raw blob, if any.
    pub fn raw(&self) -> Option<String> {
        self.data.read().blob.clone()
    }

    /// Replace the raw blob, bypassing encoding. Used to inject malformed content.
    pub fn set_raw(&self, content: impl Into<String>) {
        self.data.write().blob = Some(content.into());
    }

    /// Number of successful saves since creation.
    pub fn write_count(&self) -> usize {
        self.data.read().writes
    }

    /// Set the health status for testing storage failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Local storage is not available"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn load(&self) -> RepositoryResult<LoadOutcome> {
        self.check_health().map_err(|e| e.with_operation("load"))?;
        let data = self.data.read();
        Ok(decode_schedules(data.blob.as_deref()))
    }

    async fn save(&self, schedules: &ScheduleMap) -> RepositoryResult<()> {
        self.check_health().map_err(|e| e.with_operation("save"))?;
        let encoded = encode_schedules(schedules)?;
        let mut data = self.data.write();
        data.blob = Some(encoded);
        data.writes += 1;
        Ok(())
    }

    async fn erase(&self) -> RepositoryResult<()> {
        self.check_health().map_err(|e| e.with_operation("erase"))?;
        self.data.write().blob = None;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
