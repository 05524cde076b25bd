//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Upper bound for request bodies; a full schedule is a few tens of KiB.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Reference data
        .route("/hierarchy", get(handlers::get_hierarchy))
        // Schedules
        .route(
            "/schedules",
            get(handlers::list_schedules).delete(handlers::clear_schedules),
        )
        .route("/schedules/reload", post(handlers::reload_schedules))
        .route(
            "/schedules/{bg}",
            get(handlers::get_schedule).patch(handlers::update_schedule),
        )
        .route("/schedules/{bg}/submit", post(handlers::submit_schedule))
        .route("/schedules/{bg}/validation", get(handlers::get_validation))
        .route("/schedules/{bg}/stats", get(handlers::get_stats))
        // Positions
        .route("/schedules/{bg}/positions", post(handlers::add_position))
        .route(
            "/schedules/{bg}/positions/{pos}",
            patch(handlers::update_position).delete(handlers::remove_position),
        )
        .route(
            "/schedules/{bg}/positions/{pos}/duplicate",
            post(handlers::duplicate_position),
        )
        .route(
            "/schedules/{bg}/positions/{pos}/intervals/{index}",
            put(handlers::set_interval),
        )
        .route(
            "/schedules/{bg}/templates/{kind}",
            post(handlers::apply_template),
        )
        // Editor session
        .route("/session", get(handlers::get_session))
        .route("/session/select", post(handlers::select_balance_group))
        .route("/session/tab", put(handlers::set_tab))
        .route("/session/search", put(handlers::set_search))
        .route("/session/tree/toggle", post(handlers::toggle_tree_node))
        .route("/session/tree/expand-all", post(handlers::expand_all))
        .route("/session/tree/collapse-all", post(handlers::collapse_all))
        .route("/session/positions", post(handlers::session_add_position))
        .route(
            "/session/positions/{pos}",
            delete(handlers::session_remove_position),
        )
        .route(
            "/session/positions/{pos}/duplicate",
            post(handlers::session_duplicate_position),
        )
        .route(
            "/session/positions/{pos}/toggle",
            post(handlers::toggle_position),
        )
        .route("/session/save", post(handlers::save_session))
        // Communication overview
        .route("/communication", get(handlers::get_communication))
        .route(
            "/communication/auto-refresh",
            post(handlers::toggle_auto_refresh),
        )
        // Shell
        .route("/view", get(handlers::get_view).put(handlers::set_view));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
