use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use admin_config::{Config, TlsConfig};
use axum::Router;
use tokio::signal;

use crate::{router::health, Engine};

const DEFAULT_LISTEN_ADDRESS: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 5000);

/// Start parameters for the admin server.
pub struct ServerConfig {
    /// The admin endpoint listen address, overriding the configuration.
    pub listen_addr: Option<SocketAddr>,
    /// The admin gateway configuration.
    pub config: Config,
    /// The engine bound to the admin schema.
    pub engine: Engine,
}

/// Starts the server and serves admin requests until a termination signal.
///
/// The listen address is taken from `listen_addr`, then from the
/// configuration, and defaults to `127.0.0.1:5000`.
pub async fn serve(
    ServerConfig {
        listen_addr,
        config,
        engine,
    }: ServerConfig,
) -> crate::Result<()> {
    let router = crate::create_router(&config, engine)?;

    if config.health.enabled {
        if let Some(listen) = config.health.listen {
            let (tls, health_config) = (config.tls.clone(), config.health.clone());

            tokio::spawn(async move {
                if let Err(error) = health::bind_health_endpoint(listen, tls, health_config).await {
                    tracing::error!(%error, "health check endpoint stopped");
                }
            });
        }
    }

    let addr = listen_addr
        .or(config.network.listen_address)
        .unwrap_or(DEFAULT_LISTEN_ADDRESS);

    bind(addr, &config.graph.path, router, config.tls.as_ref()).await
}

async fn bind(addr: SocketAddr, path: &str, router: Router<()>, tls: Option<&TlsConfig>) -> crate::Result<()> {
    let app = router.into_make_service();

    let handle = axum_server::Handle::new();

    tokio::spawn(graceful_shutdown(handle.clone()));

    match tls {
        Some(tls) => {
            tracing::info!("Admin endpoint exposed at https://{addr}{path}");

            let rustls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.certificate, &tls.key)
                .await
                .map_err(crate::Error::CertificateError)?;

            axum_server::bind_rustls(addr, rustls_config)
                .handle(handle)
                .serve(app)
                .await
                .map_err(crate::Error::Server)?
        }
        None => {
            tracing::info!("Admin endpoint exposed at http://{addr}{path}");

            axum_server::bind(addr)
                .handle(handle)
                .serve(app)
                .await
                .map_err(crate::Error::Server)?
        }
    }

    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then lets in-flight requests finish for a few
/// seconds before the server stops.
async fn graceful_shutdown(handle: axum_server::Handle) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutting down gracefully...");
    handle.graceful_shutdown(Some(Duration::from_secs(3)));
}
