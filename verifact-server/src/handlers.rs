//! HTTP handlers for the fact-check API.

use crate::session::SessionProvider;
use crate::store::{ReportRecord, ReportStore};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use verifact_core::{FactCheckReport, FactChecker};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub checker: Arc<FactChecker>,
    pub sessions: Arc<dyn SessionProvider>,
    pub store: Arc<dyn ReportStore>,
    /// Reject callers without a session.
    pub require_session: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub checker: String,
}

/// Application error type
#[derive(Debug)]
pub enum ApiError {
    /// Missing, non-string or blank `text`.
    TextRequired,
    Unauthorized,
    /// The engine itself broke down; callers still get a renderable report.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::TextRequired => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Text is required"})),
            )
                .into_response(),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Unauthorized"})),
            )
                .into_response(),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to process request",
                    "message": message,
                    "timestamp": Utc::now().to_rfc3339(),
                    "fallbackResult": FactCheckReport::demo(),
                })),
            )
                .into_response(),
        }
    }
}

fn required_text(body: Result<Json<Value>, JsonRejection>) -> Result<String, ApiError> {
    let Json(body) = body.map_err(|_| ApiError::TextRequired)?;
    match body.get("text").and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(ApiError::TextRequired),
    }
}

/// Serialise a report, degrading to the minimal error payload.
fn report_json(report: &FactCheckReport) -> Value {
    serde_json::to_value(report).unwrap_or_else(|e| {
        tracing::error!(error = %e, "api.report_encode_failed");
        serde_json::to_value(FactCheckReport::error_fallback()).unwrap_or(Value::Null)
    })
}

/// POST /api/fact-check
async fn fact_check(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let session = state.sessions.session(&headers).await;
    if state.require_session && session.is_none() {
        return Err(ApiError::Unauthorized);
    }
    let text = required_text(body)?;
    tracing::info!(chars = text.chars().count(), checker = state.checker.checker_name(), "api.fact_check");

    // A panic inside the engine must not take the connection down with it.
    let checker = state.checker.clone();
    let input = text.clone();
    let report = tokio::spawn(async move { checker.check_text(&input).await })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if let Some(session) = session {
        let record = ReportRecord::new(session.user_id, text, report.clone());
        if let Err(e) = state.store.insert(record).await {
            tracing::warn!(error = %e, "api.report_store_failed");
        }
    }

    Ok(Json(report_json(&report)))
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        checker: state.checker.checker_name().to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/fact-check", post(fact_check))
        .route("/health", get(health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_must_be_a_non_blank_string() {
        let ok = required_text(Ok(Json(json!({"text": "Water is wet."}))));
        assert_eq!(ok.ok().as_deref(), Some("Water is wet."));

        for body in [json!({}), json!({"text": 42}), json!({"text": "  "}), json!("x")] {
            assert!(matches!(required_text(Ok(Json(body))), Err(ApiError::TextRequired)));
        }
    }
}
