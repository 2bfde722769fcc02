//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
};
use std::sync::Arc;
use tracing::info;

use super::models::Identity;
use super::resolver::resolve_identity;
use crate::common::{mask_email, ApiError, AppState};

/// Authenticated user extractor
///
/// Runs identity resolution over the request headers and rejects with
/// `401 Unauthenticated` when no credential produced an identity.
#[derive(Debug)]
pub struct AuthedUser {
    pub identity: Identity,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        match resolve_identity(
            &parts.headers,
            app_state.token_verifier.as_ref(),
            &app_state.config.access,
        )
        .await
        {
            Some(resolved) => {
                info!(
                    email = %mask_email(&resolved.identity.email),
                    source = resolved.source.as_str(),
                    "Identity resolved"
                );
                Ok(AuthedUser {
                    identity: resolved.identity,
                })
            }
            None => {
                info!(uri = %parts.uri, "Identity resolution failed");
                Err(ApiError::Unauthorized(
                    "No valid authentication credentials were provided".to_string(),
                ))
            }
        }
    }
}
