//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check credentials are present before the first upstream call
//! - Validate value ranges (timeouts > 0, rate limits > 0)
//! - Check base URLs and allow-list origins parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ValidationError {
    ValidationError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.credentials.key_id.is_empty() {
        errors.push(ValidationError::Empty("credentials.key_id"));
    }
    if config.credentials.secret_key.is_empty() {
        errors.push(ValidationError::Empty("credentials.secret_key"));
    }

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(invalid(
            "listener.bind_address",
            format!("not a socket address: {}", config.listener.bind_address),
        ));
    }

    for (field, base) in [
        ("upstream.trading_url", config.upstream.trading_base()),
        ("upstream.data_url", config.upstream.data_base()),
    ] {
        match Url::parse(base) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(invalid(field, format!("unsupported scheme: {}", url.scheme()))),
            Err(e) => errors.push(invalid(field, e.to_string())),
        }
    }

    for origin in &config.cors.allowed_origins {
        // Credentials mode forbids wildcard origins.
        if origin == "*" {
            errors.push(invalid("cors.allowed_origins", "wildcard origin not allowed"));
        } else if Url::parse(origin).is_err() {
            errors.push(invalid(
                "cors.allowed_origins",
                format!("not a valid origin: {origin}"),
            ));
        }
    }

    if config.rate_limit.enabled {
        if config.rate_limit.max_requests == 0 {
            errors.push(invalid("rate_limit.max_requests", "must be positive"));
        }
        if config.rate_limit.window_secs == 0 {
            errors.push(invalid("rate_limit.window_secs", "must be positive"));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(invalid("timeouts.request_secs", "must be positive"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(invalid("timeouts.upstream_secs", "must be positive"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.credentials.key_id = "key".into();
        config.credentials.secret_key = "secret".into();
        config
    }

    #[test]
    fn default_config_with_credentials_is_valid() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn missing_credentials_reported_individually() {
        let config = RelayConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::Empty("credentials.key_id")));
        assert!(errors.contains(&ValidationError::Empty("credentials.secret_key")));
    }

    #[test]
    fn collects_all_errors_not_just_first() {
        let mut config = RelayConfig::default();
        config.rate_limit.max_requests = 0;
        config.cors.allowed_origins = vec!["*".into()];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 4, "expected credentials + rate limit + cors errors, got {errors:?}");
    }

    #[test]
    fn wildcard_origin_rejected() {
        let mut config = valid_config();
        config.cors.allowed_origins = vec!["*".into()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn malformed_upstream_override_rejected() {
        let mut config = valid_config();
        config.upstream.trading_url = Some("not a url".into());
        assert!(validate_config(&config).is_err());
    }
}
