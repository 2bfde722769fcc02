// src/main.rs
use axum::{
    extract::Extension,
    http::{header, HeaderName, HeaderValue, Method},
    middleware, Router,
};
use dotenv::dotenv;
use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod health;
mod logging_middleware;
mod recipes;
mod services;

use common::{AppConfig, AppState};
use services::monitoring::{init_sentry, init_tracing};
use services::GoogleTokenVerifier;

// ============================================================================
// ROUTER COMPOSITION
// ============================================================================

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ]);

    if config.allows_any_origin() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(origins).allow_credentials(true)
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    let authenticated = Router::new()
        .merge(auth::auth_routes())
        .merge(health::health_routes())
        .layer(cors_layer(&state.config));

    Router::new()
        .merge(recipes::recipes_routes())
        .merge(authenticated)
        .layer(logging_middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging_middleware::log_request))
        .layer(logging_middleware::request_id_layer())
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing();

    let config = AppConfig::from_env();
    let _sentry_guard = init_sentry(&config);

    if config.google_client_id.is_none() {
        warn!("GOOGLE_CLIENT_ID not set - bearer and legacy cookie tokens will be rejected");
    }
    if config.access.verify_signature {
        if config.access.public_key_pem.is_none() {
            warn!("CF_ACCESS_VERIFY_SIGNATURE=true but CF_ACCESS_PUBLIC_KEY is empty - Access cookies will be rejected");
        }
    } else {
        warn!("Access JWT signatures are NOT verified; the edge proxy must strip client-set CF_Authorization cookies");
    }

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = config.database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    common::migrations::run_migrations(&pool, config.reset_db).await?;

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let http_client = Client::new();
    let token_verifier = Arc::new(GoogleTokenVerifier::new(
        http_client,
        config.tokeninfo_url.clone(),
        config.google_client_id.clone(),
    ));
    info!("GoogleTokenVerifier initialized");

    let port = config.port;
    let state = Arc::new(AppState {
        db: pool,
        config: Arc::new(config),
        token_verifier,
    });

    let app = build_app(state);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
