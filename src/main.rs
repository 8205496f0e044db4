/// Main application entry point
use launch_catalog::config::{AppConfig, StoreSource};
use launch_catalog::handlers::AppState;
use launch_catalog::repo::{init_db, MemoryLaunchStore, PgLaunchStore, RecordStore};
use launch_catalog::routes::build_router;
use launch_catalog::services::LaunchService;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,launch_catalog=debug")),
        )
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    let store = open_store(&config).await?;
    let launch_service = Arc::new(LaunchService::new(store, config.store_timeout));

    let state = AppState { launch_service };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("launch_catalog listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Connect the configured record store
async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn RecordStore>> {
    match &config.store {
        StoreSource::Postgres {
            database_url,
            table,
            max_connections,
        } => {
            let pool = PgPoolOptions::new()
                .max_connections(*max_connections)
                .acquire_timeout(config.store_timeout)
                .connect(database_url)
                .await?;
            info!("Database connection pool established");

            init_db(&pool, table).await?;
            info!(table = %table, "Launch table ready");

            Ok(Arc::new(PgLaunchStore::new(pool, table.clone())))
        }
        StoreSource::File(path) => {
            let store = MemoryLaunchStore::from_file(path)?;
            info!(
                path = %path.display(),
                items = store.len(),
                "Loaded launches into memory"
            );
            Ok(Arc::new(store))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
