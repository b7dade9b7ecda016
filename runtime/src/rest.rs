// Copyright 2026 Site Audit Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP intake API.
//!
//! `POST /api/v1/analyze` runs one analysis and echoes the caller's
//! requester metadata untouched next to the result. Configuration is
//! loaded per request.

use crate::auditor::Auditor;
use crate::config::AuditConfig;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use site_audit::{AnalysisResult, AuditError};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

type ConfigLoader = dyn Fn() -> AuditConfig + Send + Sync;

/// Shared router state: how to obtain the configuration for a request.
#[derive(Clone)]
pub struct RestState {
    load_config: Arc<ConfigLoader>,
}

impl RestState {
    /// Re-read the environment on every request.
    pub fn from_env() -> Self {
        Self {
            load_config: Arc::new(AuditConfig::from_env),
        }
    }

    /// Serve every request with a fixed configuration.
    pub fn with_config(config: AuditConfig) -> Self {
        Self {
            load_config: Arc::new(move || config.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    url: String,
    /// Opaque caller metadata (name, company, ...).
    #[serde(default)]
    requester: Value,
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    result: AnalysisResult,
    requester: Value,
}

/// Build the axum Router.
pub fn router(state: RestState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/analyze", post(handle_analyze))
        .layer(cors)
        .with_state(state)
}

/// Serve the API on `addr` until the process exits.
pub async fn start(addr: SocketAddr, state: RestState) -> anyhow::Result<()> {
    let app = router(state);
    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn error_body(status: StatusCode, code: &str, message: String) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": { "code": code, "message": message }
        })),
    )
        .into_response()
}

// ── Handlers ────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn handle_analyze(
    State(state): State<RestState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return error_body(StatusCode::BAD_REQUEST, "E_BAD_REQUEST", rejection.body_text());
        }
    };
    let auditor = Auditor::new((state.load_config)());
    match auditor.analyze_site(&body.url).await {
        Ok(result) => Json(AnalyzeResponse {
            result,
            requester: body.requester,
        })
        .into_response(),
        Err(AuditError::InvalidUrl(msg)) => error_body(StatusCode::BAD_REQUEST, "E_INVALID_URL", msg),
        Err(e) => {
            error!(url = %body.url, "analysis failed: {e}");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "E_INTERNAL", e.to_string())
        }
    }
}
