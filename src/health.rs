// src/health.rs
//! Liveness/readiness endpoint

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::common::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/health
pub async fn health_check(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let database_ok = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, "Health check database probe failed");
            false
        }
    };

    let (status, body) = if database_ok {
        (
            StatusCode::OK,
            HealthResponse {
                status: "ok",
                database: "ok",
                timestamp: Utc::now(),
            },
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            HealthResponse {
                status: "degraded",
                database: "unavailable",
                timestamp: Utc::now(),
            },
        )
    };

    (status, Json(body))
}

pub fn health_routes() -> Router {
    Router::new().route("/api/health", get(health_check))
}
