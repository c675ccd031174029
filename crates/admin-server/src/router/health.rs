use std::net::SocketAddr;

use admin_config::{HealthConfig, TlsConfig};
use axum::{routing::get, Json, Router};
use http::StatusCode;

#[derive(Debug, serde::Serialize)]
pub(super) struct HealthStatus {
    status: &'static str,
}

pub(super) async fn health() -> (StatusCode, Json<HealthStatus>) {
    (StatusCode::OK, Json(HealthStatus { status: "healthy" }))
}

/// Serves the health check on its own listener, for deployments keeping it
/// away from the admin endpoint.
pub(crate) async fn bind_health_endpoint(
    addr: SocketAddr,
    tls: Option<TlsConfig>,
    config: HealthConfig,
) -> crate::Result<()> {
    super::validate_path("health check", &config.path)?;

    let app = Router::new().route(&config.path, get(health)).into_make_service();

    match tls {
        Some(tls) => {
            tracing::info!("Health check endpoint exposed at https://{addr}{}", config.path);

            let rustls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.certificate, &tls.key)
                .await
                .map_err(crate::Error::CertificateError)?;

            axum_server::bind_rustls(addr, rustls_config)
                .serve(app)
                .await
                .map_err(crate::Error::Server)?;
        }
        None => {
            tracing::info!("Health check endpoint exposed at http://{addr}{}", config.path);

            axum_server::bind(addr).serve(app).await.map_err(crate::Error::Server)?;
        }
    }

    Ok(())
}
