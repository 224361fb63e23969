//! Application state management.
//!
//! The shared state passed to request handlers: configuration plus the
//! composed signup service. All fields are cheap Arc-backed clones.

use domain_users::{InMemoryUserRepository, SignupService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// Signup service over the in-memory repository
    pub service: SignupService<InMemoryUserRepository>,
}
