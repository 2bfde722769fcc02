// src/services/google.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::models::{Identity, IdentityClaims};
use crate::common::mask_token;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Google OAuth client id not configured")]
    NotConfigured,

    #[error("token rejected by provider: {0}")]
    Rejected(String),

    #[error("token audience mismatch (got {0:?})")]
    AudienceMismatch(Option<String>),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("malformed tokeninfo response: {0}")]
    Malformed(String),
}

impl VerifyError {
    /// True when the credential itself is bad, as opposed to the provider
    /// or our configuration failing.
    pub fn is_invalid_token(&self) -> bool {
        matches!(self, VerifyError::Rejected(_) | VerifyError::AudienceMismatch(_))
    }
}

/// Validates an OAuth credential and returns the identity it carries.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError>;
}

/// Body returned by the tokeninfo endpoint
#[derive(Debug, Deserialize)]
pub struct TokenInfoResponse {
    pub aud: Option<String>,
    pub error: Option<serde_json::Value>,
    pub error_description: Option<String>,
    #[serde(flatten)]
    pub claims: IdentityClaims,
}

/// Checks a tokeninfo body against the configured client id.
pub fn check_tokeninfo(info: TokenInfoResponse, client_id: &str) -> Result<Identity, VerifyError> {
    if let Some(error) = info.error {
        let reason = info
            .error_description
            .unwrap_or_else(|| error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string()));
        return Err(VerifyError::Rejected(reason));
    }

    match info.aud.as_deref() {
        Some(aud) if aud == client_id => {}
        other => return Err(VerifyError::AudienceMismatch(other.map(str::to_string))),
    }

    let email_verified = info.claims.email_verified_flag();
    Ok(info.claims.into_identity(email_verified))
}

/// Verifies ID tokens with Google's tokeninfo endpoint.
/// Docs: https://developers.google.com/identity/sign-in/web/backend-auth
pub struct GoogleTokenVerifier {
    http: Client,
    tokeninfo_url: String,
    client_id: Option<String>,
}

impl GoogleTokenVerifier {
    pub fn new(http: Client, tokeninfo_url: impl Into<String>, client_id: Option<String>) -> Self {
        Self {
            http,
            tokeninfo_url: tokeninfo_url.into(),
            client_id,
        }
    }
}

#[async_trait]
impl TokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let client_id = self.client_id.as_deref().ok_or(VerifyError::NotConfigured)?;

        let url = format!(
            "{}?id_token={}",
            self.tokeninfo_url,
            urlencoding::encode(token)
        );

        debug!(token = %mask_token(token), "Validating token with tokeninfo endpoint");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| VerifyError::RequestFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(http_status = %status, "tokeninfo returned error status");
            let reason = serde_json::from_str::<TokenInfoResponse>(&body)
                .ok()
                .and_then(|info| info.error_description)
                .unwrap_or_else(|| format!("tokeninfo returned {}", status));
            return Err(VerifyError::Rejected(reason));
        }

        let info = resp
            .json::<TokenInfoResponse>()
            .await
            .map_err(|e| VerifyError::Malformed(e.to_string()))?;

        check_tokeninfo(info, client_id)
    }
}
