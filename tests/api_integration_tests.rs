//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use obmc_props::{api::create_router, properties::PropertyCache, AppState, ObjectRegistry};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(ObjectRegistry::default(), PropertyCache::new(dir.path()));
    (create_router(state), dir)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn int(n: i64) -> Value {
    json!({"type": "int", "value": n})
}

// == Object Lifecycle Tests ==

#[tokio::test]
async fn test_create_and_list_objects() {
    let (app, _dir) = create_test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/objects",
        Some(json!({
            "address": "/org/openbmc/sensors/temp0",
            "properties": {"org.openbmc.SensorValue": {"value": int(21)}}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["interfaces"][0], "org.openbmc.SensorValue");

    let (status, json) = send(&app, "GET", "/objects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["/org/openbmc/sensors/temp0"]["org.openbmc.SensorValue"]["value"],
        int(21)
    );
}

#[tokio::test]
async fn test_create_invalid_address() {
    let (app, _dir) = create_test_app();

    let (status, json) = send(&app, "POST", "/objects", Some(json!({"address": "no/slash"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["fault"], "org.freedesktop.DBus.Error.InvalidArgs");
}

#[tokio::test]
async fn test_remove_object() {
    let (app, _dir) = create_test_app();
    send(&app, "POST", "/objects", Some(json!({"address": "/a/b"}))).await;

    let (status, json) = send(&app, "DELETE", "/objects/a/b", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["address"], "/a/b");

    let (_, json) = send(&app, "GET", "/objects", None).await;
    assert_eq!(json, json!({}));
}

#[tokio::test]
async fn test_remove_missing_object() {
    let (app, _dir) = create_test_app();

    let (status, json) = send(&app, "DELETE", "/objects/nothing/here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("/nothing/here"));
}

// == Property Tests ==

#[tokio::test]
async fn test_set_then_get() {
    let (app, _dir) = create_test_app();
    send(&app, "POST", "/objects", Some(json!({"address": "/a"}))).await;

    let (status, json) = send(
        &app,
        "PUT",
        "/properties/set",
        Some(json!({"object": "/a", "interface": "org.x.Y", "property": "p", "value": int(5)})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["changed"]["p"], int(5));

    let (status, json) = send(
        &app,
        "POST",
        "/properties/get",
        Some(json!({"object": "/a", "interface": "org.x.Y", "property": "p"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], int(5));
}

#[tokio::test]
async fn test_get_faults() {
    let (app, _dir) = create_test_app();
    send(&app, "POST", "/objects", Some(json!({"address": "/a"}))).await;

    let (status, json) = send(
        &app,
        "POST",
        "/properties/get-all",
        Some(json!({"object": "/a", "interface": "org.x.Y"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["fault"], "org.freedesktop.DBus.Error.UnknownInterface");

    send(
        &app,
        "PUT",
        "/properties/set",
        Some(json!({"object": "/a", "interface": "org.x.Y", "property": "p", "value": int(1)})),
    )
    .await;

    let (status, json) = send(
        &app,
        "POST",
        "/properties/get",
        Some(json!({"object": "/a", "interface": "org.x.Y", "property": "q"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["fault"], "org.freedesktop.DBus.Error.UnknownProperty");
}

#[tokio::test]
async fn test_set_multiple_reports_changed_subset() {
    let (app, _dir) = create_test_app();
    send(
        &app,
        "POST",
        "/objects",
        Some(json!({"address": "/a", "properties": {"org.x.Y": {"p": int(1), "q": int(2)}}})),
    )
    .await;

    let (status, json) = send(
        &app,
        "PUT",
        "/properties/set-multiple",
        Some(json!({"object": "/a", "interface": "org.x.Y",
                    "properties": {"p": int(1), "q": int(3)}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["changed"], json!({"q": int(3)}));
}

#[tokio::test]
async fn test_enumerate_flattens() {
    let (app, _dir) = create_test_app();
    send(
        &app,
        "POST",
        "/objects",
        Some(json!({"address": "/a",
                    "properties": {"org.x.A": {"x": int(1)}, "org.x.B": {"y": int(2)}}})),
    )
    .await;

    let (status, json) = send(&app, "GET", "/enumerate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["/a"], json!({"x": int(1), "y": int(2)}));
}

#[tokio::test]
async fn test_health_counts_objects() {
    let (app, _dir) = create_test_app();
    send(&app, "POST", "/objects", Some(json!({"address": "/a"}))).await;

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["objects"], 1);
}
