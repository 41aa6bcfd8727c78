//! Configuration loading from the process environment.

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Credential id environment variable.
pub const ENV_KEY_ID: &str = "APCA_API_KEY_ID";
/// Credential secret environment variable.
pub const ENV_SECRET_KEY: &str = "APCA_API_SECRET_KEY";
/// Optional deployment-domain hint; extends the CORS allow-list.
pub const ENV_PUBLIC_DOMAIN: &str = "RELAY_PUBLIC_DOMAIN";
/// Optional listen port.
pub const ENV_PORT: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv(name)),
    }
}

/// Build and validate a configuration from the process environment.
pub fn from_env() -> Result<RelayConfig, ConfigError> {
    let mut config = RelayConfig::default();

    config.credentials.key_id = required(ENV_KEY_ID)?;
    config.credentials.secret_key = required(ENV_SECRET_KEY)?;

    if let Ok(domain) = std::env::var(ENV_PUBLIC_DOMAIN) {
        if !domain.is_empty() {
            config
                .cors
                .allowed_origins
                .push(format!("https://{domain}"));
        }
    }

    if let Ok(port) = std::env::var(ENV_PORT) {
        let port: u16 = port.parse().map_err(|_| ConfigError::InvalidEnv {
            name: ENV_PORT,
            value: port.clone(),
        })?;
        config.listener.bind_address = format!("0.0.0.0:{port}");
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
