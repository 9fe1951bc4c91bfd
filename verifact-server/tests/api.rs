//! Integration tests for the HTTP API

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot
use verifact_common::Result;
use verifact_config::ServerSettings;
use verifact_core::checker::{ClaimChecker, MockChecker};
use verifact_core::{ClaimResult, FactChecker};
use verifact_server::handlers::{create_router, AppState, HealthResponse};
use verifact_server::session::{AnonymousSessions, StaticTokenSessions};
use verifact_server::default_state;
use verifact_server::store::{InMemoryReportStore, ReportRecord, ReportStore, StoreError};

fn state_with(checker: FactChecker, store: Arc<dyn ReportStore>) -> AppState {
    AppState {
        checker: Arc::new(checker),
        sessions: Arc::new(AnonymousSessions),
        store,
        require_session: false,
    }
}

fn mock_app() -> (Router, Arc<InMemoryReportStore>) {
    let store = Arc::new(InMemoryReportStore::new());
    let app = create_router(state_with(
        FactChecker::new(Arc::new(MockChecker)),
        store.clone(),
    ));
    (app, store)
}

fn post(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/fact-check")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn fact_check_returns_report() {
    let (app, store) = mock_app();
    let response = app
        .oneshot(post(r#"{"text": "The Earth is round. Pluto is a planet."}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["truthScore"], json!(50));
    let results = body["factCheckResults"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["status"], json!("ACCURATE"));
    assert_eq!(results[1]["source"], json!("VeriFact Knowledge Base"));
    assert!(body["summary"].as_str().unwrap().contains("2 claims"));

    let records = store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_id, "anonymous");
}

#[tokio::test]
async fn invalid_text_is_rejected() {
    for body in [r#"{}"#, r#"{"text": 7}"#, r#"{"text": "   "}"#, "not json"] {
        let (app, _) = mock_app();
        let response = app.oneshot(post(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(body_json(response).await, json!({"error": "Text is required"}));
    }
}

#[tokio::test]
async fn session_required_without_token_is_unauthorized() {
    let state = AppState {
        sessions: Arc::new(StaticTokenSessions::new([("secret", "ada")])),
        require_session: true,
        ..state_with(
            FactChecker::new(Arc::new(MockChecker)),
            Arc::new(InMemoryReportStore::new()),
        )
    };
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(post(r#"{"text": "The Earth is round."}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({"error": "Unauthorized"}));

    let mut authorised = post(r#"{"text": "The Earth is round."}"#);
    authorised
        .headers_mut()
        .insert("authorization", "Bearer secret".parse().unwrap());
    let response = app.oneshot(authorised).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

fn with_bearer(mut request: Request<Body>, token: &str) -> Request<Body> {
    request
        .headers_mut()
        .insert("authorization", format!("Bearer {token}").parse().unwrap());
    request
}

#[tokio::test]
async fn configured_tokens_gate_the_default_state() {
    let settings = ServerSettings {
        require_session: true,
        tokens: HashMap::from([("ada".to_string(), "secret".to_string())]),
        ..ServerSettings::default()
    };
    let app = create_router(default_state(FactChecker::new(Arc::new(MockChecker)), &settings));
    let body = r#"{"text": "The Earth is round."}"#;

    let response = app.clone().oneshot(post(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(with_bearer(post(body), "wrong")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.oneshot(with_bearer(post(body), "secret")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn required_sessions_without_tokens_admit_nobody() {
    let settings = ServerSettings {
        require_session: true,
        ..ServerSettings::default()
    };
    let app = create_router(default_state(FactChecker::new(Arc::new(MockChecker)), &settings));
    let response = app
        .oneshot(with_bearer(post(r#"{"text": "The Earth is round."}"#), "anything"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn default_settings_admit_anonymous_callers() {
    let app = create_router(default_state(
        FactChecker::new(Arc::new(MockChecker)),
        &ServerSettings::default(),
    ));
    let response = app
        .oneshot(post(r#"{"text": "The Earth is round."}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

struct BrokenStore;

#[async_trait]
impl ReportStore for BrokenStore {
    async fn insert(&self, _record: ReportRecord) -> std::result::Result<(), StoreError> {
        Err(StoreError::Unavailable("disk full".into()))
    }
}

#[tokio::test]
async fn store_failure_does_not_affect_response() {
    let app = create_router(state_with(
        FactChecker::new(Arc::new(MockChecker)),
        Arc::new(BrokenStore),
    ));
    let response = app
        .oneshot(post(r#"{"text": "The Earth is round."}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["truthScore"], json!(100));
}

struct PanickingChecker;

#[async_trait]
impl ClaimChecker for PanickingChecker {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn check(&self, _claim: &str) -> Result<Option<ClaimResult>> {
        panic!("checker exploded")
    }
}

#[tokio::test]
async fn engine_breakdown_returns_fallback() {
    let app = create_router(state_with(
        FactChecker::new(Arc::new(PanickingChecker)),
        Arc::new(InMemoryReportStore::new()),
    ));
    let response = app
        .oneshot(post(r#"{"text": "Honey is edible for thousands of years."}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["error"], json!("Failed to process request"));
    assert!(body["timestamp"].is_string());
    assert!(body["message"].is_string());
    assert_eq!(body["fallbackResult"]["truthScore"], json!(50));
    assert_eq!(
        body["fallbackResult"]["factCheckResults"].as_array().map(Vec::len),
        Some(2)
    );
}

#[tokio::test]
async fn health_names_the_checker() {
    let (app, _) = mock_app();
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.checker, "mock");
}
