use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use shopkeep_core::settings::StoreId;
use shopkeep_db::{DatabaseHandles, DbPool, SessionStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopkeep_api::config::{database_url_var, ServerConfig};
use shopkeep_api::router::build_app_router;
use shopkeep_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "shopkeep_api=debug,shopkeep_db=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Databases ---
    let mut sources: Vec<(StoreId, DbPool)> = Vec::with_capacity(config.database_urls.len());
    for (id, url) in &config.database_urls {
        match shopkeep_db::create_pool(url).await {
            Ok(pool) => {
                tracing::info!(db_key = %id, "Database connection pool created");
                sources.push((*id, pool));
            }
            Err(e) if *id == StoreId::Primary => {
                panic!("Failed to connect to primary database: {e}");
            }
            Err(e) => {
                tracing::warn!(
                    db_key = %id,
                    env_var = %database_url_var(*id),
                    error = %e,
                    "Database unavailable, continuing without it",
                );
            }
        }
    }
    let databases = DatabaseHandles::from_sources(sources);

    // --- Sessions ---
    let sessions = SessionStore::from_handles(&databases);
    if let Some(e) = sessions.initialize().await.error() {
        tracing::error!(error = %e, "Failed to initialize session table");
    } else {
        tracing::info!("Session table ready");
    }

    // --- App state ---
    let state = AppState {
        databases: Arc::new(databases),
        sessions: Arc::new(sessions),
        config: Arc::new(config.clone()),
    };

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

    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let (signalled_tx, mut signalled_rx) = tokio::sync::watch::channel(false);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(true);
        })
        .into_future();

    // In-flight requests get `shutdown_timeout` to drain once a signal arrives.
    let drain_deadline = async move {
        let _ = signalled_rx.changed().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        result = server => result.expect("Server error"),
        () = drain_deadline => {
            tracing::warn!(
                timeout_secs = shutdown_timeout.as_secs(),
                "In-flight requests did not drain in time, forcing shutdown",
            );
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
