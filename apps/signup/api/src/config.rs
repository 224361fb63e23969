use core_config::{app_info, env_or_default, server::ServerConfig, AppInfo, ConfigError, FromEnv};
use std::time::Duration;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `core_config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    /// OTP validity window (OTP_TTL_SECONDS, default 60)
    pub otp_ttl: Duration,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let otp_ttl = otp_ttl_from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            otp_ttl,
        })
    }
}

fn otp_ttl_from_env() -> Result<Duration, ConfigError> {
    let seconds: u64 = env_or_default("OTP_TTL_SECONDS", "60")
        .parse()
        .map_err(|e| ConfigError::ParseError {
            key: "OTP_TTL_SECONDS".to_string(),
            details: format!("{}", e),
        })?;

    Ok(Duration::from_secs(seconds))
}
