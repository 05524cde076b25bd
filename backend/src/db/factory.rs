//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::config::StorageConfig;
use super::repo_config::RepositoryConfig;
use super::repositories::{FileRepository, LocalRepository};
use super::repository::{RepositoryError, RepositoryResult, ScheduleRepository};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// JSON file on disk
    File,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("file", "json", "local", "memory").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Defaults to File, since an in-memory store
    /// would lose every edit on restart.
    pub fn from_env() -> Self {
        std::env::var("REPOSITORY_TYPE")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(Self::File)
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use tso_schedule::db::{RepositoryFactory, RepositoryType};
///
/// let repo = RepositoryFactory::create(RepositoryType::Local, None).unwrap();
/// assert_eq!(repo.location(), "memory");
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `storage` - Optional file configuration (defaults apply when absent)
    pub fn create(
        repo_type: RepositoryType,
        storage: Option<&StorageConfig>,
    ) -> RepositoryResult<Arc<dyn ScheduleRepository>> {
        match repo_type {
            RepositoryType::File => {
                let config = storage.cloned().unwrap_or_default();
                Ok(Self::create_file(&config))
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a file repository.
    pub fn create_file(config: &StorageConfig) -> Arc<dyn ScheduleRepository> {
        Arc::new(FileRepository::new(config.path.clone()))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn ScheduleRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    ///
    /// Reads `REPOSITORY_TYPE` and `SCHEDULE_STORE_PATH`.
    pub fn from_env() -> RepositoryResult<Arc<dyn ScheduleRepository>> {
        let repo_type = RepositoryType::from_env();
        let storage = StorageConfig::from_env().map_err(RepositoryError::configuration)?;
        Self::create(repo_type, Some(&storage))
    }

    /// Create repository from a TOML configuration file.
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn ScheduleRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config)
    }

    /// Create repository from the default configuration file location.
    pub fn from_default_config() -> RepositoryResult<Arc<dyn ScheduleRepository>> {
        let config = RepositoryConfig::from_default_location()?;
        Self::from_repository_config(&config)
    }

    fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn ScheduleRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        Self::create(repo_type, Some(&config.to_storage_config()))
    }
}

/// Builder for configuring repository creation.
///
/// # Example
/// ```
/// use tso_schedule::db::{RepositoryBuilder, RepositoryType, StorageConfig};
///
/// let repo = RepositoryBuilder::new()
///     .repository_type(RepositoryType::File)
///     .storage_config(StorageConfig::new("/tmp/tso-schedules.json"))
///     .build()
///     .unwrap();
/// assert_eq!(repo.location(), "/tmp/tso-schedules.json");
/// ```
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    storage: Option<StorageConfig>,
}

impl RepositoryBuilder {
    /// Create a new repository builder with settings from the environment.
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::from_env(),
            storage: None,
        }
    }

    /// Set the repository type.
    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    /// Set the file storage configuration.
    pub fn storage_config(mut self, config: StorageConfig) -> Self {
        self.storage = Some(config);
        self
    }

    /// Load configuration from a TOML file.
    pub fn from_config_file<P: AsRef<Path>>(
        mut self,
        config_path: P,
    ) -> Result<Self, RepositoryError> {
        let repo_config = RepositoryConfig::from_file(config_path)?;

        self.repo_type = repo_config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        self.storage = Some(repo_config.to_storage_config());
        Ok(self)
    }

    /// Build the repository instance.
    pub fn build(self) -> RepositoryResult<Arc<dyn ScheduleRepository>> {
        RepositoryFactory::create(self.repo_type, self.storage.as_ref())
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
