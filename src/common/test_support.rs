//! Fixtures shared by module tests

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use super::{migrations::run_migrations, AppConfig, AppState};
use crate::auth::models::Identity;
use crate::services::google::VerifyError;
use crate::services::TokenVerifier;

pub const TEST_CLIENT_ID: &str = "test-client.apps.googleusercontent.com";

/// Single-connection in-memory pool with the schema applied. One connection
/// keeps every query on the same database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool, false).await.unwrap();
    pool
}

pub fn identity(email: &str, name: &str) -> Identity {
    Identity {
        email: email.to_string(),
        name: name.to_string(),
        picture: None,
        email_verified: true,
    }
}

/// In-process stand-in for the tokeninfo endpoint. Records every token it
/// is asked about.
#[derive(Default)]
pub struct StubVerifier {
    accepted: HashMap<String, Identity>,
    wrong_audience: Vec<String>,
    unreachable: bool,
    calls: Mutex<Vec<String>>,
}

impl StubVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(mut self, token: &str, identity: Identity) -> Self {
        self.accepted.insert(token.to_string(), identity);
        self
    }

    pub fn wrong_audience(mut self, token: &str) -> Self {
        self.wrong_audience.push(token.to_string());
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        self.calls.lock().unwrap().push(token.to_string());

        if self.unreachable {
            return Err(VerifyError::RequestFailed("connection refused".to_string()));
        }
        if self.wrong_audience.iter().any(|t| t == token) {
            return Err(VerifyError::AudienceMismatch(Some("other-client".to_string())));
        }
        self.accepted
            .get(token)
            .cloned()
            .ok_or_else(|| VerifyError::Rejected("Invalid Value".to_string()))
    }
}

pub async fn test_state(verifier: Arc<StubVerifier>) -> Arc<AppState> {
    Arc::new(AppState {
        db: memory_pool().await,
        config: Arc::new(AppConfig::for_tests(TEST_CLIENT_ID)),
        token_verifier: verifier,
    })
}

pub async fn test_app(verifier: Arc<StubVerifier>) -> (Router, Arc<AppState>) {
    let state = test_state(verifier).await;
    (crate::build_app(state.clone()), state)
}

/// Sends one request through the router and decodes the JSON body
/// (`Value::Null` when empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}
