//! Server infrastructure.
//!
//! - Application setup with OpenAPI documentation
//! - Health endpoint
//! - Graceful shutdown on SIGTERM/SIGINT

use crate::errors::not_found;
use axum::{routing::get, Json, Router};
use core_config::{server::ServerConfig, AppInfo};
use serde::Serialize;
use std::io;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};
use utoipa::OpenApi;

/// Health check response body.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub version: String,
}

/// Creates a router exposing `/health`.
///
/// Liveness only: returns 200 with the app name and version whenever
/// the process is up. Readiness belongs to the app, which knows its
/// dependencies.
pub fn health_router(app: AppInfo) -> Router {
    Router::new().route(
        "/health",
        get(move || {
            let app = app.clone();
            async move {
                Json(HealthResponse {
                    status: "healthy".to_string(),
                    name: app.name,
                    version: app.version,
                })
            }
        }),
    )
}

/// Creates a configured Axum router with common middleware and docs.
///
/// Sets up:
/// - Swagger UI at `/docs` backed by the generated OpenAPI document
/// - API routes nested under `/api`
/// - Request tracing and CORS
/// - 404 fallback handler
///
/// CORS origins come from the comma-separated `CORS_ALLOWED_ORIGIN`
/// environment variable; when unset, a permissive layer is used (local
/// development).
///
/// # Type Parameters
/// * `T` - A type implementing `utoipa::OpenApi` for API documentation
pub fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_swagger_ui::SwaggerUi;

    let cors = match std::env::var("CORS_ALLOWED_ORIGIN") {
        Ok(origins_str) => {
            let allowed_origins: Vec<axum::http::HeaderValue> = origins_str
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<axum::http::HeaderValue>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
                    )
                })?;

            CorsLayer::new().allow_origin(allowed_origins)
        }
        Err(_) => CorsLayer::permissive(),
    };

    let router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    Ok(router)
}

/// Starts the Axum server with graceful shutdown.
///
/// # Errors
/// Returns an error if the TCP listener fails to bind or the server
/// encounters an error while running.
pub async fn create_app(router: Router, server_config: &ServerConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;

    info!("Server starting on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        })?;

    Ok(())
}

/// Completes when SIGTERM or SIGINT is received.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
