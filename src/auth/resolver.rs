//! Multi-source identity resolution
//!
//! Credentials are tried in a fixed order and the first success wins:
//!
//! 1. `Authorization: Bearer <token>`, verified with the OAuth provider
//! 2. `CF_Authorization` cookie, decoded as an Access JWT
//! 3. `google_token` cookie (or `authToken` when absent), verified like 1
//!
//! A failed attempt is logged and the next source is tried.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use super::access_token::access_identity;
use super::models::{IdentitySource, ResolvedIdentity};
use crate::common::config::AccessConfig;
use crate::common::mask_token;
use crate::services::TokenVerifier;

pub const ACCESS_COOKIE: &str = "CF_Authorization";
pub const LEGACY_COOKIES: [&str; 2] = ["google_token", "authToken"];

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Non-empty, percent-decoded value of the named cookie.
fn cookie_token(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
}

async fn verify_with_provider(
    verifier: &dyn TokenVerifier,
    token: &str,
    source: IdentitySource,
) -> Option<ResolvedIdentity> {
    match verifier.verify(token).await {
        Ok(identity) => Some(ResolvedIdentity { identity, source }),
        Err(e) => {
            warn!(
                source = source.as_str(),
                token = %mask_token(token),
                error = %e,
                "Token verification failed, trying next credential"
            );
            None
        }
    }
}

pub async fn resolve_identity(
    headers: &HeaderMap,
    verifier: &dyn TokenVerifier,
    access: &AccessConfig,
) -> Option<ResolvedIdentity> {
    if let Some(token) = bearer_token(headers) {
        if let Some(resolved) = verify_with_provider(verifier, token, IdentitySource::Bearer).await
        {
            return Some(resolved);
        }
    }

    let jar = CookieJar::from_headers(headers);

    if let Some(token) = cookie_token(&jar, ACCESS_COOKIE) {
        match access_identity(&token, access) {
            Ok(identity) => {
                return Some(ResolvedIdentity {
                    identity,
                    source: IdentitySource::AccessCookie,
                })
            }
            Err(e) => warn!(error = %e, "Access cookie rejected, trying next credential"),
        }
    }

    // Only one legacy cookie is tried: authToken is a fallback name, not a
    // second credential.
    let legacy = LEGACY_COOKIES
        .iter()
        .find_map(|name| cookie_token(&jar, name));
    if let Some(token) = legacy {
        return verify_with_provider(verifier, &token, IdentitySource::LegacyCookie).await;
    }

    debug!("No credential produced an identity");
    None
}
