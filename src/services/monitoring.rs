// src/services/monitoring.rs
//! Logging and error-reporting setup

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::common::AppConfig;

/// Installs the global tracing subscriber: env-filtered fmt output plus the
/// sentry breadcrumb/event layer.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(sentry_tracing::layer())
        .init();
}

/// Initializes the Sentry client when a DSN is configured. The returned
/// guard must live for the rest of the process.
pub fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let Some(dsn) = config.sentry_dsn.as_deref() else {
        info!("Sentry DSN not configured");
        return None;
    };

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(config.environment.clone().into()),
            traces_sample_rate: 0.0,
            ..Default::default()
        },
    ));

    info!("Sentry initialized successfully");
    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentry_disabled_without_dsn() {
        let config = AppConfig::for_tests("client-1");
        assert!(init_sentry(&config).is_none());
    }
}
