#![cfg(feature = "http-server")]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use tso_schedule::db::{FileRepository, LocalRepository};
use tso_schedule::http::{create_router, AppState};
use tso_schedule::services::StaticReferenceData;

async fn app() -> (Router, LocalRepository) {
    let repo = LocalRepository::new();
    let state = AppState::new(Arc::new(repo.clone()), &StaticReferenceData).await;
    (create_router(state), repo)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "available");
}

#[tokio::test]
async fn test_hierarchy_search() {
    let (app, _) = app().await;
    let (status, body) = send(&app, Method::GET, "/v1/hierarchy", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["balanceGroups"], 18);

    let (_, body) = send(&app, Method::GET, "/v1/hierarchy?search=BKW", None).await;
    assert_eq!(body["stats"], json!({"countries": 1, "tsos": 1, "balanceGroups": 1}));
    assert_eq!(body["countries"][0]["code"], "CH");
}

#[tokio::test]
async fn test_unknown_balance_group_is_404() {
    let (app, _) = app().await;
    let (status, body) = send(&app, Method::GET, "/v1/schedules/atlantis-bg1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_does_not_create_schedule() {
    let (app, repo) = app().await;
    let (status, body) = send(&app, Method::GET, "/v1/schedules/apg-bg1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sender"], "10X1001A1001A13X");
    assert_eq!(body["positions"], json!([]));

    let (_, list) = send(&app, Method::GET, "/v1/schedules", None).await;
    assert_eq!(list["total"], 0);
    assert_eq!(repo.write_count(), 0);
}

#[tokio::test]
async fn test_position_lifecycle() {
    let (app, _) = app().await;
    let (status, body) = send(&app, Method::POST, "/v1/schedules/apg-bg2/positions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let pos = body["positionId"].as_str().unwrap().to_string();
    assert_eq!(body["schedule"]["positions"][0]["positionId"], "POS_1");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/v1/schedules/apg-bg2/positions/{pos}"),
        Some(json!({"businessType": "A04"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["positions"][0]["businessType"], "A04");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/v1/schedules/apg-bg2/positions/{pos}/intervals/95"),
        Some(json!({"value": 12.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["positions"][0]["intervals"][95], 12.5);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/v1/schedules/apg-bg2/positions/{pos}/duplicate"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["schedule"]["positions"][1]["positionId"], "POS_1_COPY");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/v1/schedules/apg-bg2/positions/{pos}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["positions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_bad_inputs_are_400() {
    let (app, _) = app().await;
    let (_, body) = send(&app, Method::POST, "/v1/schedules/apg-bg2/positions", None).await;
    let pos = body["positionId"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/v1/schedules/apg-bg2/positions/{pos}"),
        Some(json!({"intervals": [1.0, 2.0, 3.0]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/v1/schedules/apg-bg2/positions/{pos}/intervals/96"),
        Some(json!({"value": 1.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::POST, "/v1/schedules/apg-bg2/templates/ramp", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_non_numeric_interval_index_is_json_400() {
    let (app, _) = app().await;
    let (_, body) = send(&app, Method::POST, "/v1/schedules/apg-bg2/positions", None).await;
    let pos = body["positionId"].as_str().unwrap().to_string();

    for index in ["abc", "-1"] {
        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/v1/schedules/apg-bg2/positions/{pos}/intervals/{index}"),
            Some(json!({"value": 1.0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_missing_position_is_404() {
    let (app, _) = app().await;
    let (status, _) = send(
        &app,
        Method::PATCH,
        "/v1/schedules/apg-bg2/positions/pos_0",
        Some(json!({"isActive": false})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_template_validation_and_submit() {
    let (app, _) = app().await;
    let bg = "/v1/schedules/tennet-bg1";
    send(&app, Method::POST, &format!("{bg}/positions"), None).await;

    let (status, body) = send(&app, Method::POST, &format!("{bg}/submit"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"], json!(["Position 1: No energy values defined"]));

    let (status, body) = send(&app, Method::POST, &format!("{bg}/templates/flat50"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "flat");
    assert_eq!(body["positionsUpdated"], 1);

    let (_, report) = send(&app, Method::GET, &format!("{bg}/validation"), None).await;
    assert_eq!(report["valid"], true);

    let (_, stats) = send(&app, Method::GET, &format!("{bg}/stats"), None).await;
    assert_eq!(stats["totalEnergy"], 4800.0);
    assert_eq!(stats["avgPower"], 50.0);

    let (status, _) = send(&app, Method::POST, &format!("{bg}/submit"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_clear_store() {
    let (app, repo) = app().await;
    send(&app, Method::POST, "/v1/schedules/apg-bg1/positions", None).await;
    assert!(repo.raw().is_some());

    let (status, _) = send(&app, Method::DELETE, "/v1/schedules", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(repo.raw().is_none());

    let (_, list) = send(&app, Method::GET, "/v1/schedules", None).await;
    assert_eq!(list["balanceGroupIds"], json!([]));
}

#[tokio::test]
async fn test_session_save_redirects_to_validation() {
    let (app, _) = app().await;

    let (status, _) = send(&app, Method::POST, "/v1/session/save", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/session/select",
        Some(json!({"balanceGroupId": "swissgrid-bg1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["selection"]["tsoId"], "swissgrid");
    assert_eq!(body["schedule"]["inDomain"], "CH");

    let (status, body) = send(&app, Method::POST, "/v1/session/positions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["session"]["expandedPositions"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::POST, "/v1/session/save", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, Method::GET, "/v1/session", None).await;
    assert_eq!(body["session"]["activeTab"], "validation");
}

#[tokio::test]
async fn test_session_tree_and_tab() {
    let (app, _) = app().await;

    let (_, body) = send(&app, Method::POST, "/v1/session/tree/expand-all", None).await;
    assert_eq!(body["session"]["tree"]["expanded"].as_array().unwrap().len(), 9);

    let (_, body) = send(
        &app,
        Method::POST,
        "/v1/session/tree/toggle",
        Some(json!({"nodeId": "apg"})),
    )
    .await;
    assert_eq!(body["expanded"], false);

    let (_, body) = send(&app, Method::POST, "/v1/session/tree/collapse-all", None).await;
    assert_eq!(body["session"]["tree"]["expanded"], json!([]));

    let (status, body) = send(
        &app,
        Method::PUT,
        "/v1/session/tab",
        Some(json!({"tab": "positions"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["activeTab"], "positions");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/v1/session/search",
        Some(json!({"term": "verbund"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["balanceGroups"], 1);
}

#[tokio::test]
async fn test_communication_overview() {
    let (app, _) = app().await;
    let (status, body) = send(&app, Method::GET, "/v1/communication", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["stats"],
        json!({"total": 5, "outbound": 4, "inbound": 1, "pending": 0, "anomalies": 1})
    );
    assert_eq!(body["messages"][2]["statusClass"], "warning");
    assert_eq!(body["messages"][0]["id"], "MSG-20240904-001");
    assert_eq!(body["autoRefresh"], true);

    let (_, body) = send(&app, Method::POST, "/v1/communication/auto-refresh", None).await;
    assert_eq!(body["autoRefresh"], false);
}

#[tokio::test]
async fn test_view_selection() {
    let (app, _) = app().await;
    let (_, body) = send(&app, Method::GET, "/v1/view", None).await;
    assert_eq!(body["view"], "dashboard");

    let (_, body) = send(&app, Method::PUT, "/v1/view", Some(json!({"view": "editor"}))).await;
    assert_eq!(body["view"], "editor");

    let (_, body) = send(&app, Method::PUT, "/v1/view", Some(json!({"view": "reports"}))).await;
    assert_eq!(body["view"], "dashboard");
}

#[tokio::test]
async fn test_external_write_is_reported_until_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tso-schedules.json");
    let state = AppState::new(Arc::new(FileRepository::new(&path)), &StaticReferenceData).await;
    let app = create_router(state);
    let add = "/v1/schedules/apg-bg1/positions";

    let (status, _) = send(&app, Method::POST, add, None).await;
    assert_eq!(status, StatusCode::CREATED);

    // Another process replaces the stored blob.
    std::fs::write(&path, "{}").unwrap();

    for _ in 0..3 {
        let (status, body) = send(&app, Method::POST, add, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
    }
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");

    let (status, body) = send(&app, Method::POST, "/v1/schedules/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);

    let (status, body) = send(&app, Method::POST, add, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["schedule"]["positions"].as_array().unwrap().len(), 1);

    let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk["apg-bg1"]["positions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unavailable_storage_is_500() {
    let (app, repo) = app().await;
    repo.set_healthy(false);

    let (status, body) = send(&app, Method::POST, "/v1/schedules/apg-bg1/positions", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "REPOSITORY_ERROR");

    repo.set_healthy(true);
    let (status, body) = send(&app, Method::POST, "/v1/schedules/apg-bg1/positions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["schedule"]["positions"].as_array().unwrap().len(), 2);
}
