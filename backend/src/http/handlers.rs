//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer. Handlers under `/schedules/{bg}` answer 404 for balance groups that
//! are not part of the reference hierarchy.
//!
//! Mutating handlers report a failed write of the store after applying the
//! change in memory: 409 when another process changed the stored blob, 500
//! otherwise. The failure persists until `POST /v1/schedules/reload`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{debug, info, warn};

use super::dto::{
    AutoRefreshResponse, CommunicationResponse, HealthResponse, HierarchyQuery,
    HierarchyResponse, IntervalValueRequest, MessageView, PositionCreatedResponse,
    ScheduleListResponse, SearchRequest, SelectRequest, SessionResponse, TabRequest,
    TemplateQuery, TemplateResponse, ToggleResponse, TreeToggleRequest, ViewRequest,
    ViewResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::{format_timestamp, PositionUpdate, Schedule, ScheduleUpdate};
use crate::services::{
    filter_hierarchy, validate, HierarchyStats, IntervalTemplate, SaveOutcome, ScheduleStats,
    ScheduleStore, StatusClass, ValidationReport,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn ensure_known(store: &ScheduleStore, balance_group_id: &str) -> Result<(), AppError> {
    if store.knows_balance_group(balance_group_id) {
        Ok(())
    } else {
        Err(AppError::unknown_balance_group(balance_group_id))
    }
}

/// Fail with the store's recorded write error, if any.
fn persisted(store: &ScheduleStore) -> Result<(), AppError> {
    match store.last_persist_error() {
        Some(e) => Err(AppError::Repository(e.clone())),
        None => Ok(()),
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let storage = match state.repository.health_check().await {
        Ok(true) => "available".to_string(),
        Ok(false) => "unavailable".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        storage,
    }))
}

// =============================================================================
// Reference Hierarchy
// =============================================================================

/// GET /v1/hierarchy?search=
pub async fn get_hierarchy(
    State(state): State<AppState>,
    query: Result<Query<HierarchyQuery>, QueryRejection>,
) -> HandlerResult<HierarchyResponse> {
    let Query(query) = query?;
    let store = state.store.lock().await;
    let countries = filter_hierarchy(store.hierarchy(), query.search.as_deref().unwrap_or(""));
    let stats = HierarchyStats::of(&countries);
    Ok(Json(HierarchyResponse { countries, stats }))
}

// =============================================================================
// Schedules
// =============================================================================

/// GET /v1/schedules
///
/// List balance groups with a stored schedule.
pub async fn list_schedules(State(state): State<AppState>) -> HandlerResult<ScheduleListResponse> {
    let store = state.store.lock().await;
    let balance_group_ids = store.balance_group_ids();
    let total = balance_group_ids.len();
    Ok(Json(ScheduleListResponse {
        balance_group_ids,
        total,
    }))
}

/// DELETE /v1/schedules
///
/// Drop every schedule and erase the persisted store.
pub async fn clear_schedules(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let mut store = state.store.lock().await;
    store.clear().await;
    persisted(&store)?;
    info!("Schedule store cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/schedules/reload
///
/// Discard in-memory edits and re-read the persisted store. Clears a
/// recorded write conflict.
pub async fn reload_schedules(
    State(state): State<AppState>,
) -> HandlerResult<ScheduleListResponse> {
    let mut store = state.store.lock().await;
    store.reload().await;
    let balance_group_ids = store.balance_group_ids();
    let total = balance_group_ids.len();
    info!("Reloaded {} schedule(s) from {}", total, state.repository.location());
    Ok(Json(ScheduleListResponse {
        balance_group_ids,
        total,
    }))
}

/// GET /v1/schedules/{bg}
///
/// Stored schedule, or the default a first edit would create.
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(balance_group_id): Path<String>,
) -> HandlerResult<Schedule> {
    let store = state.store.lock().await;
    ensure_known(&store, &balance_group_id)?;
    Ok(Json(store.get(&balance_group_id)))
}

/// PATCH /v1/schedules/{bg}
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(balance_group_id): Path<String>,
    payload: Result<Json<ScheduleUpdate>, JsonRejection>,
) -> HandlerResult<Schedule> {
    let Json(update) = payload?;
    let mut store = state.store.lock().await;
    ensure_known(&store, &balance_group_id)?;
    let schedule = store.update(&balance_group_id, update).await;
    persisted(&store)?;
    Ok(Json(schedule))
}

/// POST /v1/schedules/{bg}/submit
///
/// Validate and store the schedule. Validation failures answer 422 with
/// the error list.
pub async fn submit_schedule(
    State(state): State<AppState>,
    Path(balance_group_id): Path<String>,
) -> HandlerResult<Schedule> {
    let mut store = state.store.lock().await;
    ensure_known(&store, &balance_group_id)?;

    let errors = validate(&store.get(&balance_group_id));
    if !errors.is_empty() {
        debug!(
            "Rejected submit of {} with {} error(s)",
            balance_group_id,
            errors.len()
        );
        return Err(AppError::Validation(errors));
    }

    let schedule = store
        .update(&balance_group_id, ScheduleUpdate::default())
        .await;
    persisted(&store)?;
    info!("Submitted schedule {} for {}", schedule.message_id, balance_group_id);
    Ok(Json(schedule))
}

/// GET /v1/schedules/{bg}/validation
pub async fn get_validation(
    State(state): State<AppState>,
    Path(balance_group_id): Path<String>,
) -> HandlerResult<ValidationReport> {
    let store = state.store.lock().await;
    ensure_known(&store, &balance_group_id)?;
    let schedule = store.get(&balance_group_id);
    Ok(Json(ValidationReport::for_schedule(balance_group_id, &schedule)))
}

/// GET /v1/schedules/{bg}/stats
pub async fn get_stats(
    State(state): State<AppState>,
    Path(balance_group_id): Path<String>,
) -> HandlerResult<ScheduleStats> {
    let store = state.store.lock().await;
    ensure_known(&store, &balance_group_id)?;
    Ok(Json(ScheduleStats::compute(&store.get(&balance_group_id))))
}

// =============================================================================
// Positions
// =============================================================================

/// POST /v1/schedules/{bg}/positions
pub async fn add_position(
    State(state): State<AppState>,
    Path(balance_group_id): Path<String>,
) -> Result<(StatusCode, Json<PositionCreatedResponse>), AppError> {
    let mut store = state.store.lock().await;
    ensure_known(&store, &balance_group_id)?;
    let position_id = store.add_position(&balance_group_id).await;
    persisted(&store)?;
    Ok((
        StatusCode::CREATED,
        Json(PositionCreatedResponse {
            position_id,
            schedule: store.get(&balance_group_id),
        }),
    ))
}

/// POST /v1/schedules/{bg}/positions/{pos}/duplicate
pub async fn duplicate_position(
    State(state): State<AppState>,
    Path((balance_group_id, position_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<PositionCreatedResponse>), AppError> {
    let mut store = state.store.lock().await;
    ensure_known(&store, &balance_group_id)?;
    let copy_id = store
        .duplicate_position(&balance_group_id, &position_id)
        .await
        .ok_or_else(|| AppError::unknown_position(&balance_group_id, &position_id))?;
    persisted(&store)?;
    Ok((
        StatusCode::CREATED,
        Json(PositionCreatedResponse {
            position_id: copy_id,
            schedule: store.get(&balance_group_id),
        }),
    ))
}

/// PATCH /v1/schedules/{bg}/positions/{pos}
pub async fn update_position(
    State(state): State<AppState>,
    Path((balance_group_id, position_id)): Path<(String, String)>,
    payload: Result<Json<PositionUpdate>, JsonRejection>,
) -> HandlerResult<Schedule> {
    let Json(update) = payload?;
    let mut store = state.store.lock().await;
    ensure_known(&store, &balance_group_id)?;
    if !store
        .update_position(&balance_group_id, &position_id, update)
        .await
    {
        return Err(AppError::unknown_position(&balance_group_id, &position_id));
    }
    persisted(&store)?;
    Ok(Json(store.get(&balance_group_id)))
}

/// DELETE /v1/schedules/{bg}/positions/{pos}
///
/// Removing a missing position is not an error.
pub async fn remove_position(
    State(state): State<AppState>,
    Path((balance_group_id, position_id)): Path<(String, String)>,
) -> HandlerResult<Schedule> {
    let mut store = state.store.lock().await;
    ensure_known(&store, &balance_group_id)?;
    store.remove_position(&balance_group_id, &position_id).await;
    persisted(&store)?;
    Ok(Json(store.get(&balance_group_id)))
}

/// PUT /v1/schedules/{bg}/positions/{pos}/intervals/{index}
pub async fn set_interval(
    State(state): State<AppState>,
    path: Result<Path<(String, String, usize)>, PathRejection>,
    payload: Result<Json<IntervalValueRequest>, JsonRejection>,
) -> HandlerResult<Schedule> {
    let Path((balance_group_id, position_id, index)) = path?;
    let Json(request) = payload?;
    let mut store = state.store.lock().await;
    ensure_known(&store, &balance_group_id)?;
    if !store
        .set_interval(&balance_group_id, &position_id, index, request.value)
        .await?
    {
        return Err(AppError::unknown_position(&balance_group_id, &position_id));
    }
    persisted(&store)?;
    Ok(Json(store.get(&balance_group_id)))
}

/// POST /v1/schedules/{bg}/templates/{kind}?position=
pub async fn apply_template(
    State(state): State<AppState>,
    Path((balance_group_id, kind)): Path<(String, String)>,
    query: Result<Query<TemplateQuery>, QueryRejection>,
) -> HandlerResult<TemplateResponse> {
    let Query(query) = query?;
    let template: IntervalTemplate = kind.parse().map_err(AppError::BadRequest)?;
    let mut store = state.store.lock().await;
    ensure_known(&store, &balance_group_id)?;

    let positions_updated = store
        .apply_template(&balance_group_id, template, query.position.as_deref())
        .await;
    persisted(&store)?;
    Ok(Json(TemplateResponse {
        template: template.to_string(),
        positions_updated,
        schedule: store.get(&balance_group_id),
    }))
}

// =============================================================================
// Editor Session
// =============================================================================

async fn session_response(state: &AppState) -> SessionResponse {
    let session = state.session.lock().await;
    let store = state.store.lock().await;
    SessionResponse {
        schedule: session.current_schedule(&store),
        session: session.clone(),
    }
}

/// GET /v1/session
pub async fn get_session(State(state): State<AppState>) -> HandlerResult<SessionResponse> {
    Ok(Json(session_response(&state).await))
}

/// POST /v1/session/select
pub async fn select_balance_group(
    State(state): State<AppState>,
    payload: Result<Json<SelectRequest>, JsonRejection>,
) -> HandlerResult<SessionResponse> {
    let Json(request) = payload?;
    {
        let mut session = state.session.lock().await;
        let store = state.store.lock().await;
        if !session.select_balance_group(store.hierarchy(), &request.balance_group_id) {
            return Err(AppError::unknown_balance_group(&request.balance_group_id));
        }
    }
    Ok(Json(session_response(&state).await))
}

/// PUT /v1/session/tab
pub async fn set_tab(
    State(state): State<AppState>,
    payload: Result<Json<TabRequest>, JsonRejection>,
) -> HandlerResult<SessionResponse> {
    let Json(request) = payload?;
    state.session.lock().await.set_tab(request.tab);
    Ok(Json(session_response(&state).await))
}

/// PUT /v1/session/search
///
/// Returns the hierarchy filtered by the new term.
pub async fn set_search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> HandlerResult<HierarchyResponse> {
    let Json(request) = payload?;
    let mut session = state.session.lock().await;
    let store = state.store.lock().await;
    session.set_search_term(request.term);
    let countries = session.visible_hierarchy(store.hierarchy());
    let stats = HierarchyStats::of(&countries);
    Ok(Json(HierarchyResponse { countries, stats }))
}

/// POST /v1/session/tree/toggle
pub async fn toggle_tree_node(
    State(state): State<AppState>,
    payload: Result<Json<TreeToggleRequest>, JsonRejection>,
) -> HandlerResult<ToggleResponse> {
    let Json(request) = payload?;
    let expanded = state.session.lock().await.tree_mut().toggle(&request.node_id);
    Ok(Json(ToggleResponse { expanded }))
}

/// POST /v1/session/tree/expand-all
pub async fn expand_all(State(state): State<AppState>) -> HandlerResult<SessionResponse> {
    {
        let mut session = state.session.lock().await;
        let store = state.store.lock().await;
        session.tree_mut().expand_all(store.hierarchy());
    }
    Ok(Json(session_response(&state).await))
}

/// POST /v1/session/tree/collapse-all
pub async fn collapse_all(State(state): State<AppState>) -> HandlerResult<SessionResponse> {
    state.session.lock().await.tree_mut().collapse_all();
    Ok(Json(session_response(&state).await))
}

/// POST /v1/session/positions
///
/// Add a position to the selected schedule. 400 without a selection.
pub async fn session_add_position(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    {
        let mut session = state.session.lock().await;
        let mut store = state.store.lock().await;
        session
            .add_position(&mut store)
            .await
            .ok_or_else(|| AppError::BadRequest("No balance group selected".to_string()))?;
        persisted(&store)?;
    }
    Ok((StatusCode::CREATED, Json(session_response(&state).await)))
}

/// POST /v1/session/positions/{pos}/duplicate
pub async fn session_duplicate_position(
    State(state): State<AppState>,
    Path(position_id): Path<String>,
) -> HandlerResult<SessionResponse> {
    {
        let mut session = state.session.lock().await;
        let mut store = state.store.lock().await;
        session.duplicate_position(&mut store, &position_id).await;
        persisted(&store)?;
    }
    Ok(Json(session_response(&state).await))
}

/// DELETE /v1/session/positions/{pos}
pub async fn session_remove_position(
    State(state): State<AppState>,
    Path(position_id): Path<String>,
) -> HandlerResult<SessionResponse> {
    {
        let mut session = state.session.lock().await;
        let mut store = state.store.lock().await;
        session.remove_position(&mut store, &position_id).await;
        persisted(&store)?;
    }
    Ok(Json(session_response(&state).await))
}

/// POST /v1/session/positions/{pos}/toggle
pub async fn toggle_position(
    State(state): State<AppState>,
    Path(position_id): Path<String>,
) -> HandlerResult<ToggleResponse> {
    let expanded = state
        .session
        .lock()
        .await
        .toggle_position_expanded(&position_id);
    Ok(Json(ToggleResponse { expanded }))
}

/// POST /v1/session/save
///
/// Validation failures answer 422 and switch the session to the validation tab.
pub async fn save_session(State(state): State<AppState>) -> HandlerResult<Schedule> {
    let mut session = state.session.lock().await;
    let mut store = state.store.lock().await;
    match session.save(&mut store).await {
        SaveOutcome::Saved(schedule) => {
            persisted(&store)?;
            Ok(Json(schedule))
        }
        SaveOutcome::Rejected(errors) => {
            warn!("Save rejected with {} validation error(s)", errors.len());
            Err(AppError::Validation(errors))
        }
        SaveOutcome::NoSelection => {
            Err(AppError::BadRequest("No balance group selected".to_string()))
        }
    }
}

// =============================================================================
// Communication Overview
// =============================================================================

/// GET /v1/communication
pub async fn get_communication(State(state): State<AppState>) -> HandlerResult<CommunicationResponse> {
    let overview = state.communication.lock().await;
    let messages = overview
        .messages()
        .iter()
        .map(|m| MessageView {
            status_class: StatusClass::of(&m.status),
            message: m.clone(),
        })
        .collect();

    Ok(Json(CommunicationResponse {
        messages,
        stats: overview.stats(),
        auto_refresh: overview.auto_refresh(),
        current_time: format_timestamp(overview.current_time()),
        clock: overview.clock_display(),
    }))
}

/// POST /v1/communication/auto-refresh
pub async fn toggle_auto_refresh(State(state): State<AppState>) -> HandlerResult<AutoRefreshResponse> {
    let auto_refresh = state.communication.lock().await.toggle_auto_refresh();
    Ok(Json(AutoRefreshResponse { auto_refresh }))
}

// =============================================================================
// Shell
// =============================================================================

/// GET /v1/view
pub async fn get_view(State(state): State<AppState>) -> HandlerResult<ViewResponse> {
    let view = state.shell.lock().await.active();
    Ok(Json(ViewResponse { view }))
}

/// PUT /v1/view
///
/// Unknown view names select the dashboard.
pub async fn set_view(
    State(state): State<AppState>,
    payload: Result<Json<ViewRequest>, JsonRejection>,
) -> HandlerResult<ViewResponse> {
    let Json(request) = payload?;
    let view = state.shell.lock().await.select_named(&request.view);
    Ok(Json(ViewResponse { view }))
}
