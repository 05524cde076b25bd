//! # TSO Schedule Workbench
//!
//! Back end for a demo transmission-system-operator scheduling workflow.
//!
//! The crate keeps one day-ahead power schedule per balance group, each made
//! of positions with 96 quarter-hour values, and persists the whole store as
//! a single JSON blob. Around that store it provides the state of the
//! dashboard views: a searchable country / TSO / balance-group tree, a
//! schedule editor session with field-presence validation, a communication
//! overview over fixed sample traffic, and the top-level view selector.
//!
//! ## Architecture
//!
//! - [`models`]: Schedule documents, the reference hierarchy and time helpers
//! - [`db`]: Repository pattern and persistence of the schedule blob
//! - [`services`]: Schedule store, editor session, validation, statistics,
//!   tree navigation, communication overview and view shell
//! - [`http`]: Axum-based HTTP server and request handlers
//!

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
