//! Persistence module for the schedule store.
//!
//! This module provides abstractions for persisting the schedule blob via the
//! Repository pattern, allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, editor session)           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  ScheduleStore (services/schedule_store.rs)             │
//! │  - In-memory authoritative state                        │
//! │  - Full re-serialization after every mutation           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                │
//! ┌───▼──────────────┐     ┌───────────▼─────────────┐
//! │ File Repository  │     │ Local Repository        │
//! │ (JSON on disk)   │     │ (in-memory)             │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! The module includes:
//! - `repository`: Trait definition and the shared blob codec
//! - `repositories::file`: JSON file implementation with conflict detection
//! - `repositories::local`: In-memory implementation for unit testing
//! - `factory`: Factory for creating repository instances
//! - `config` / `repo_config`: Environment and TOML configuration

pub mod checksum;
pub mod config;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

pub use checksum::calculate_checksum;
pub use config::StorageConfig;
pub use repo_config::RepositoryConfig;

pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repositories::{FileRepository, LocalRepository};
pub use repository::{
    ErrorContext, LoadOutcome, RepositoryError, RepositoryResult, ScheduleRepository,
};
