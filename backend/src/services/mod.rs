//! Service layer for schedule state and the dashboard views.
//!
//! Services sit between the persistence layer and the HTTP handlers. They own
//! the in-memory state of the editor, the communication overview and the view
//! shell, and implement the pure derivations (validation, statistics, tree
//! filtering) over that state.

pub mod communication;
pub mod editor;
pub mod navigation;
pub mod reference_data;
pub mod schedule_store;
pub mod shell;
pub mod stats;
pub mod templates;
pub mod validation;

pub use communication::{CommunicationOverview, CommunicationStats, StatusClass};
pub use editor::{EditorSession, EditorTab, SaveOutcome, Selection};
pub use navigation::{filter_hierarchy, HierarchyStats, TreeState};
pub use reference_data::{ReferenceDataProvider, StaticReferenceData};
pub use schedule_store::ScheduleStore;
pub use shell::{Shell, View};
pub use stats::ScheduleStats;
pub use templates::IntervalTemplate;
pub use validation::{validate, ValidationReport};
