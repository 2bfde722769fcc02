// Application state shared by every handler

use sqlx::SqlitePool;
use std::sync::Arc;

use super::config::AppConfig;
use crate::services::TokenVerifier;

/// Database pool, configuration and the OAuth token verifier. Read-only
/// after startup.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub token_verifier: Arc<dyn TokenVerifier>,
}
