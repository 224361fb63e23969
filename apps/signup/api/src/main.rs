use axum_helpers::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::sync::Arc;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use domain_notifications::{InMemorySmsProvider, SmsProvider, TwilioProvider};
use domain_users::{InMemoryUserRepository, SignupService};
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    // SMS provider: Twilio when credentials are configured, otherwise
    // the in-memory provider (messages only logged, never delivered)
    let sms: Arc<dyn SmsProvider> = match TwilioProvider::from_env() {
        Ok(provider) => {
            info!("SMS delivery via Twilio");
            Arc::new(provider)
        }
        Err(e) => {
            if config.environment.is_production() {
                return Err(eyre::eyre!("Twilio configuration required in production: {}", e));
            }
            warn!("Twilio not configured ({}), using in-memory SMS provider", e);
            Arc::new(InMemorySmsProvider::new())
        }
    };

    let repository = InMemoryUserRepository::new();
    let service = SignupService::with_otp_ttl(repository, sms, config.otp_ttl);

    let state = AppState {
        config,
        service,
    };

    // Build router with API routes
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(api_routes)?;

    // Merge health endpoints into the app
    // - /health: liveness check with app name/version
    // - /ready: readiness check
    let app = router
        .merge(health_router(state.config.app.clone()))
        .merge(api::ready_router(state.clone()));

    info!("Starting signup API");
    create_app(app, &state.config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Signup API shutdown complete");
    Ok(())
}
