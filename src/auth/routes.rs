//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /api/auth/me` - Resolve the caller's identity
/// - `POST /api/verify-google` - Verify a Google ID token
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/me", get(handlers::me_handler))
        .route("/api/verify-google", post(handlers::verify_google))
}
