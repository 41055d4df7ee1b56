use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;

use idm_api::auth::TokenVerifier;
use idm_api::config::AppConfig;
use idm_api::router::build_app_router;
use idm_api::state::AppState;
use idm_api::telemetry;

/// In-flight requests get this long to finish once shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = AppConfig::from_env()?;

    // --- Tracing ---
    telemetry::init(&config.log);
    tracing::info!(
        name = %config.name,
        version = %config.version,
        host = %config.host,
        port = config.port,
        "Loaded server configuration"
    );

    // axum-server also links aws-lc-rs; pin the process-wide provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    // --- Database ---
    let pool = idm_db::create_pool(&config.database.dsn, &config.database.pool_settings())
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    idm_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    idm_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    // --- Auth ---
    let verifier = TokenVerifier::from_config(&config.auth)?;
    tracing::info!(jwks_url = %config.auth.jwks_url, "Token verifier ready");

    // --- TLS ---
    let tls = RustlsConfig::from_pem_file(&config.tls.cert_path, &config.tls.key_path)
        .await
        .with_context(|| {
            format!(
                "Failed to load TLS certificate {} / key {}",
                config.tls.cert_path.display(),
                config.tls.key_path.display()
            )
        })?;

    let ip: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address {:?}", config.host))?;
    let addr = SocketAddr::new(ip, config.port);

    // --- Router ---
    let app = build_app_router(AppState::with_pool(config, pool.clone(), verifier));

    // --- Start server ---
    let handle = Handle::new();
    tokio::spawn(shutdown_on_signal(handle.clone()));

    tracing::info!(%addr, "Starting HTTPS server");
    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("Server error")?;

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM, then ask the server to drain.
async fn shutdown_on_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }

    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
