//! Application startup and lifecycle management.

use crate::config::StoriesConfig;
use crate::handlers;
use crate::services::{bootstrap, DatabaseGate};
use axum::{
    body::Body,
    http::Method,
    middleware::from_fn,
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{make_request_span, metrics_middleware, request_id_middleware};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state. Cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub gate: DatabaseGate,
}

/// Any origin may read; the API has no write routes.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(handlers::greeting))
        .route("/api/stories", get(handlers::list_stories))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .fallback(handlers::not_found)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .layer(cors_layer())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Application {
    /// Bootstrap the database, then bind the listener.
    ///
    /// A failed bootstrap aborts only when `MONGO_FAIL_FAST` is set; otherwise
    /// the service starts with a closed gate and reports itself not ready.
    pub async fn build(config: StoriesConfig) -> Result<Self, AppError> {
        let gate = DatabaseGate::closed();

        if let Err(e) = bootstrap(&config.mongodb, &gate).await {
            if config.mongodb.fail_fast {
                tracing::error!(error = %e, "MongoDB bootstrap failed, aborting startup");
                return Err(e);
            }
            tracing::error!(
                error = %e,
                "MongoDB bootstrap failed; database routes will answer 503"
            );
        }

        Self::with_gate(config, gate).await
    }

    /// Bind the listener around an already prepared gate.
    pub async fn with_gate(config: StoriesConfig, gate: DatabaseGate) -> Result<Self, AppError> {
        let state = AppState { gate };
        let router = build_router(state.clone());

        // Port 0 picks a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            database_ready = state.gate.is_open(),
            "Stories service listening"
        );

        Ok(Self {
            port,
            listener,
            router,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn gate(&self) -> &DatabaseGate {
        &self.state.gate
    }

    /// Serve until Ctrl+C or SIGTERM, draining in-flight requests.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
