use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use insta::assert_yaml_snapshot;
use serde_json::Value;
use taskr_server::web::{health_check_handler, openapi_handler, welcome_handler};
use tower::ServiceExt;

mod common;

use common::HttpResponseSnapshot;

/// Create a router for testing web endpoints.
/// This function creates a minimal router with just the public routes needed for testing.
fn create_test_router() -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .route("/", axum::routing::get(welcome_handler))
        .route("/api-docs/openapi.json", axum::routing::get(openapi_handler))
}

#[tokio::test]
async fn can_render_welcome_message() {
    let app = create_test_router();

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_text = std::str::from_utf8(&body).unwrap();

    let snapshot = HttpResponseSnapshot::new(body_text, status, &headers, "welcome_message");
    assert_yaml_snapshot!(snapshot);
}

#[tokio::test]
async fn can_check_health_endpoint() {
    let app = create_test_router();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_text = std::str::from_utf8(&body).unwrap();

    let snapshot = HttpResponseSnapshot::new(body_text, status, &headers, "health_check");
    assert_yaml_snapshot!(snapshot);
}

#[tokio::test]
async fn can_serve_openapi_document() {
    let app = create_test_router();

    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let doc: Value = serde_json::from_slice(&body).unwrap();

    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/v1/tasks"));
    assert!(paths.contains_key("/api/v1/tasks/{id}"));
    assert!(paths["/api/v1/tasks/{id}"]["put"].is_object());
    assert!(paths["/api/v1/tasks/{id}"]["delete"].is_object());
    assert_eq!(
        doc["components"]["schemas"]["Frequency"]["enum"],
        serde_json::json!(["daily", "weekly", "monthly", "yearly", "other"])
    );
}
