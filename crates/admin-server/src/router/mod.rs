mod admin;
mod cors;
pub(crate) mod health;
mod state;

use std::time::Duration;

use admin_config::Config;
use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, timeout::RequestBodyTimeoutLayer};

use crate::Engine;
use state::ServerState;

const DEFAULT_REQUEST_BODY_TIMEOUT: Duration = Duration::from_secs(30);

/// Creates the router serving the admin endpoint, and the health check unless
/// it has a listener of its own.
pub fn create(config: &Config, engine: Engine) -> crate::Result<Router> {
    let path = config.graph.path.as_str();

    validate_path("admin", path)?;

    let serve_health = config.health.enabled && config.health.listen.is_none();

    if serve_health && config.health.path == path {
        return Err(crate::Error::InvalidRoute(format!(
            "the health check and the admin endpoint both use {path}"
        )));
    }

    let state = ServerState::new(engine, config.request_body_limit_bytes(), config.gateway.timeout);

    let mut router = Router::new().route(path, get(admin::execute).post(admin::execute));

    if serve_health {
        validate_path("health check", &config.health.path)?;

        router = router.route(&config.health.path, get(health::health));
    }

    let cors = match config.cors {
        Some(ref cors_config) => cors::generate(cors_config)?,
        None => CorsLayer::permissive(),
    };

    let router = router
        .with_state(state)
        .layer(RequestBodyTimeoutLayer::new(
            config.gateway.timeout.unwrap_or(DEFAULT_REQUEST_BODY_TIMEOUT),
        ))
        .layer(cors);

    Ok(router)
}

/// Routes are served literally: captures and wildcards would make axum panic
/// or match more than the configured path.
pub(crate) fn validate_path(name: &str, path: &str) -> crate::Result<()> {
    if !path.starts_with('/') {
        return Err(crate::Error::InvalidRoute(format!("the {name} path {path} must start with a slash")));
    }

    if path.contains([':', '*']) {
        return Err(crate::Error::InvalidRoute(format!(
            "the {name} path {path} must not contain captures or wildcards"
        )));
    }

    Ok(())
}
