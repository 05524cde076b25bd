//! Repository implementations module.
//!
//! This module contains the implementations of the `ScheduleRepository` trait:
//! - `file`: JSON file on disk, the default for the server
//! - `local`: In-memory implementation for unit testing and local development
pub mod file;
pub mod local;

pub use file::FileRepository;
pub use local::LocalRepository;
