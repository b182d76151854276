//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::future::Future;
use std::sync::Arc;

use ama_common::{AppConfig, AppError, JwtService, StorageBackend};
use ama_db::{create_pool, default_migrations_dir, run_migrations, MemoryStore, PoolConfig};
use ama_gateway::Hub;
use ama_service::ServiceContextBuilder;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware_with_config;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let router = create_router().merge(ama_gateway::routes::<AppState>());
    let router = apply_middleware_with_config(
        router,
        &config.allowed_origins(),
        config.app.env.is_production(),
    );
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
///
/// Starts the hub, then wires the configured storage backend to publish
/// through it.
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let hub = Hub::new_shared(config.hub.clone());

    let builder = match config.storage.backend {
        StorageBackend::Postgres => {
            let database = config.database.as_ref().ok_or_else(|| {
                AppError::Config("database settings are required for postgres storage".into())
            })?;

            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&PoolConfig::from(database))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");

            run_migrations(&pool, default_migrations_dir())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("Migrations applied");

            ServiceContextBuilder::new().postgres(pool)
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            ServiceContextBuilder::new().memory(Arc::new(MemoryStore::new()))
        }
    };

    let service_context = builder
        .publisher(hub.publisher())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);

    Ok(AppState::new(service_context, hub, jwt_service, config))
}

/// Serve the application on an already bound listener
///
/// When `shutdown` resolves, the hub closes every live connection with
/// Going Away before in-flight HTTP requests are drained.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let hub = Arc::clone(state.hub());
    let app = create_app(state);

    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            hub.shutdown().await;
        })
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration until interrupted
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.address();
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    let state = create_app_state(config).await?;
    serve(listener, state, shutdown_signal()).await
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
