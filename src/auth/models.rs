//! Authentication data models

use serde::{Deserialize, Serialize};

/// A signed-in user as reported to the front end. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub email_verified: bool,
}

/// Profile claims shared by Google tokeninfo responses and Access JWT
/// payloads. Unknown claims are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct IdentityClaims {
    pub email: Option<String>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
    pub email_verified: Option<serde_json::Value>,
}

impl IdentityClaims {
    /// `name`, then `given_name`, `family_name`, `email`, then `"User"`.
    pub fn display_name(&self) -> String {
        [&self.name, &self.given_name, &self.family_name, &self.email]
            .into_iter()
            .flatten()
            .find(|v| !v.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| "User".to_string())
    }

    /// tokeninfo reports `email_verified` as the string `"true"`; JWTs
    /// carry a real boolean.
    pub fn email_verified_flag(&self) -> bool {
        match &self.email_verified {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn into_identity(self, email_verified: bool) -> Identity {
        let name = self.display_name();
        Identity {
            email: self.email.unwrap_or_default(),
            name,
            picture: self.picture.filter(|p| !p.is_empty()),
            email_verified,
        }
    }
}

/// Which credential produced an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    Bearer,
    AccessCookie,
    LegacyCookie,
}

impl IdentitySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentitySource::Bearer => "bearer",
            IdentitySource::AccessCookie => "access_cookie",
            IdentitySource::LegacyCookie => "legacy_cookie",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedIdentity {
    pub identity: Identity,
    pub source: IdentitySource,
}

/// Body of `POST /api/verify-google`
#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: Option<String>,
}
