// src/common/config.rs
//! Process configuration loaded once at startup

use std::env;

const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Settings for the `CF_Authorization` cookie path.
///
/// With `verify_signature` off the Access JWT payload is trusted as-is.
/// That mirrors the legacy deployment, where the edge proxy is the only
/// thing able to set the cookie. Turn it on to require an RS256 signature
/// checked against `public_key_pem`.
#[derive(Debug, Clone, Default)]
pub struct AccessConfig {
    pub verify_signature: bool,
    pub public_key_pem: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub google_client_id: Option<String>,
    pub tokeninfo_url: String,
    pub access: AccessConfig,
    pub cors_origins: Vec<String>,
    pub reset_db: bool,
    pub sentry_dsn: Option<String>,
    pub environment: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let access = AccessConfig {
            verify_signature: env_flag("CF_ACCESS_VERIFY_SIGNATURE"),
            public_key_pem: non_empty_var("CF_ACCESS_PUBLIC_KEY"),
            audience: non_empty_var("CF_ACCESS_AUDIENCE"),
        };

        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()));

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://recipes.db".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080),
            google_client_id: non_empty_var("GOOGLE_CLIENT_ID"),
            tokeninfo_url: non_empty_var("GOOGLE_TOKENINFO_URL")
                .unwrap_or_else(|| DEFAULT_TOKENINFO_URL.to_string()),
            access,
            cors_origins,
            reset_db: env_flag("RESET_DB"),
            sentry_dsn: non_empty_var("SENTRY_DSN"),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Configuration used by tests and local tooling: in-memory database,
    /// fixed client id, legacy Access cookie handling.
    #[cfg(test)]
    pub fn for_tests(client_id: &str) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            google_client_id: Some(client_id.to_string()),
            tokeninfo_url: DEFAULT_TOKENINFO_URL.to_string(),
            access: AccessConfig::default(),
            cors_origins: vec!["*".to_string()],
            reset_db: false,
            sentry_dsn: None,
            environment: "test".to_string(),
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}
