use std::net::SocketAddr;
use std::sync::Arc;

use dapparchive_db::DataAccess;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dapparchive_api::config::ServerConfig;
use dapparchive_api::router::build_app_router;
use dapparchive_api::state::{providers_from_config, AppState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dapparchive_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    // Connectivity problems degrade the catalog instead of aborting
    // startup: reads serve fallback data and writes report 503 until the
    // store comes back.
    let data = match &config.database_url {
        Some(url) => {
            if let Err(reason) = dapparchive_db::validate_database_url(url) {
                tracing::warn!(%reason, "DATABASE_URL failed validation, attempting anyway");
            }
            match dapparchive_db::create_pool(url) {
                Ok(pool) => {
                    match dapparchive_db::run_migrations(&pool).await {
                        Ok(()) => tracing::info!("Database migrations applied"),
                        Err(err) => {
                            tracing::warn!(error = %err, "Migrations failed, continuing degraded")
                        }
                    }
                    if config.seed_on_start {
                        match dapparchive_db::seed::seed_demo_data(&pool).await {
                            Ok(()) => tracing::info!("Demo data seeded"),
                            Err(err) => tracing::warn!(error = %err, "Seeding failed, skipping"),
                        }
                    }
                    DataAccess::connected(pool, config.retry.clone())
                }
                Err(err) => {
                    tracing::error!(error = %err, "Invalid database URL, starting disconnected");
                    DataAccess::disconnected(config.retry.clone())
                }
            }
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, starting in degraded mode");
            DataAccess::disconnected(config.retry.clone())
        }
    };

    // --- External providers ---
    let (identity, storage, billing) = providers_from_config(&config);

    // --- App state ---
    let state = AppState {
        data: data.clone(),
        config: Arc::new(config.clone()),
        identity,
        storage,
        billing,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    if let Some(pool) = data.pool() {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
}
