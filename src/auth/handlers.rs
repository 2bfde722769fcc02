//! Authentication handlers

use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    http::header,
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use super::AuthedUser;
use super::models::VerifyTokenRequest;
use crate::common::{mask_email, ApiError, AppState};

/// Identity responses must never be cached by browsers or proxies.
const NO_STORE: [(header::HeaderName, &str); 3] = [
    (
        header::CACHE_CONTROL,
        "no-store, no-cache, must-revalidate, private",
    ),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
];

/// GET /api/auth/me
/// Returns the identity behind the request's credentials
///
/// # Response
/// ```json
/// { "email": "...", "name": "...", "picture": null, "email_verified": true }
/// ```
pub async fn me_handler(authed: Result<AuthedUser, ApiError>) -> impl IntoResponse {
    (NO_STORE, authed.map(|user| Json(user.identity)))
}

/// POST /api/verify-google
/// Verifies a Google ID token without establishing a session
///
/// # Request Body
/// ```json
/// { "token": "<google id token>" }
/// ```
pub async fn verify_google(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<VerifyTokenRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let token = payload
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Token is required".to_string()))?;

    match state.token_verifier.verify(token.trim()).await {
        Ok(identity) => {
            info!(email = %mask_email(&identity.email), "Google token verified");
            Ok(Json(json!({ "success": true, "user": identity })))
        }
        Err(e) if e.is_invalid_token() => {
            warn!(error = %e, "Google token rejected");
            Err(ApiError::Unauthorized("Invalid token".to_string()))
        }
        Err(e) => Err(ApiError::UpstreamFailure(e.to_string())),
    }
}
