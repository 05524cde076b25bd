//! Data Transfer Objects for the HTTP API.
//!
//! Domain types that already derive Serialize/Deserialize (schedules,
//! reference nodes, reports) are returned as-is; the types here wrap them
//! with request parameters and response envelopes.

use serde::{Deserialize, Serialize};

use crate::models::{Country, Schedule};
use crate::services::communication::{CommunicationMessage, CommunicationStats, StatusClass};
use crate::services::{EditorSession, EditorTab, HierarchyStats, View};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Storage backend status
    pub storage: String,
}

/// Query parameters for the hierarchy endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HierarchyQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyResponse {
    pub countries: Vec<Country>,
    pub stats: HierarchyStats,
}

/// Balance groups with a stored schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleListResponse {
    pub balance_group_ids: Vec<String>,
    pub total: usize,
}

/// Response of operations that create a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionCreatedResponse {
    pub position_id: String,
    pub schedule: Schedule,
}

/// Query parameters for template application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateQuery {
    /// Target position; every position when absent.
    pub position: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    pub template: String,
    pub positions_updated: usize,
    pub schedule: Schedule,
}

/// Body for a single interval edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalValueRequest {
    pub value: f64,
}

/// Editor session together with the selected schedule.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session: EditorSession,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    pub balance_group_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabRequest {
    pub tab: EditorTab,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub term: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeToggleRequest {
    pub node_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub expanded: bool,
}

/// A sample message annotated with its display class.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    #[serde(flatten)]
    pub message: CommunicationMessage,
    pub status_class: StatusClass,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationResponse {
    pub messages: Vec<MessageView>,
    pub stats: CommunicationStats,
    pub auto_refresh: bool,
    pub current_time: String,
    pub clock: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoRefreshResponse {
    pub auto_refresh: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewRequest {
    pub view: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewResponse {
    pub view: View,
}
