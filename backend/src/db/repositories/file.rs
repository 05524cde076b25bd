//! JSON file repository.
//!
//! Stores the schedule blob in a single file, standing in for browser local
//! storage. Writes go through a temporary sibling file and a rename so a
//! crash never leaves a half-written blob.
//!
//! # Concurrent writers
//!
//! The repository remembers the checksum of the blob it last read or wrote.
//! Before overwriting, it re-reads the file; if another process changed it in
//! the meantime the save is refused with [`RepositoryError::Conflict`] instead
//! of silently clobbering the other session. `erase` is unconditional.

use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::db::checksum::calculate_checksum;
use crate::db::repository::{
    decode_schedules, encode_schedules, ErrorContext, LoadOutcome, RepositoryError,
    RepositoryResult, ScheduleRepository,
};
use crate::models::ScheduleMap;

/// What this repository last saw on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Observed {
    /// Nothing read or written yet; the first save is accepted.
    Unknown,
    Absent,
    Checksum(String),
}

impl Observed {
    fn of(content: Option<&str>) -> Self {
        match content {
            None => Observed::Absent,
            Some(c) => Observed::Checksum(calculate_checksum(c)),
        }
    }
}

/// Repository persisting the schedule blob to a JSON file.
pub struct FileRepository {
    path: PathBuf,
    observed: Mutex<Observed>,
}

impl FileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            observed: Mutex::new(Observed::Unknown),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn context(&self, operation: &str) -> ErrorContext {
        ErrorContext::new(operation).with_entity(self.path.display().to_string())
    }

    async fn read_raw(&self, operation: &str) -> RepositoryResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepositoryError::io_with_context(
                e.to_string(),
                self.context(operation),
            )),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ScheduleRepository for FileRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        match tokio::fs::metadata(&dir).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(RepositoryError::io_with_context(
                e.to_string(),
                self.context("health_check"),
            )),
        }
    }

    async fn load(&self) -> RepositoryResult<LoadOutcome> {
        let raw = self.read_raw("load").await?;
        *self.observed.lock() = Observed::of(raw.as_deref());
        Ok(decode_schedules(raw.as_deref()))
    }

    async fn save(&self, schedules: &ScheduleMap) -> RepositoryResult<()> {
        let encoded = encode_schedules(schedules).map_err(|e| e.with_operation("save"))?;

        let on_disk = Observed::of(self.read_raw("save").await?.as_deref());
        let expected = self.observed.lock().clone();
        if expected != Observed::Unknown && expected != on_disk {
            return Err(RepositoryError::conflict_with_context(
                "stored schedules were modified by another session",
                self.context("save")
                    .with_details("reload before writing again"),
            ));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    RepositoryError::io_with_context(e.to_string(), self.context("save"))
                })?;
            }
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, encoded.as_bytes())
            .await
            .map_err(|e| RepositoryError::io_with_context(e.to_string(), self.context("save")))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| RepositoryError::io_with_context(e.to_string(), self.context("save")))?;

        debug!(
            "Wrote {} schedules to {}",
            schedules.len(),
            self.path.display()
        );
        *self.observed.lock() = Observed::of(Some(&encoded));
        Ok(())
    }

    async fn erase(&self) -> RepositoryResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(RepositoryError::io_with_context(
                    e.to_string(),
                    self.context("erase"),
                ))
            }
        }
        *self.observed.lock() = Observed::Absent;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
