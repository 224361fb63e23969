//! # Axum Helpers
//!
//! Utilities and middleware shared by the workspace's Axum services.
//!
//! ## Modules
//!
//! - **[`errors`]**: Structured error responses
//! - **[`extractors`]**: Custom extractors (validated JSON)
//! - **[`server`]**: Server setup, health endpoints, graceful shutdown

pub mod errors;
pub mod extractors;
pub mod server;

// Re-export error types
pub use errors::ErrorResponse;

// Re-export extractors
pub use extractors::ValidatedJson;

// Re-export server types
pub use server::{create_app, create_router, health_router, shutdown_signal, HealthResponse};
