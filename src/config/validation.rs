//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::BridgeConfig;

/// A semantic configuration error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind-address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("bridge.{field} {value:?} must be empty or start with '/' and not end with '/'")]
    InvalidPath { field: &'static str, value: String },

    #[error("observability.log-level {0:?} is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn check_path(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    let well_formed = value.is_empty() || (value.starts_with('/') && !value.ends_with('/'));
    if !well_formed {
        errors.push(ValidationError::InvalidPath {
            field,
            value: value.to_string(),
        });
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    check_path("root-path", &config.bridge.root_path, &mut errors);
    check_path("ws-path", &config.bridge.ws_path, &mut errors);

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
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

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&BridgeConfig::default()).is_ok());
    }

    #[test]
    fn test_root_path_shape() {
        let mut config = BridgeConfig::default();
        config.bridge.root_path = "/api".to_string();
        assert!(validate_config(&config).is_ok());

        config.bridge.root_path = "api".to_string();
        assert!(validate_config(&config).is_err());

        config.bridge.root_path = "/api/".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_log_level_must_be_known() {
        let mut config = BridgeConfig::default();
        config.observability.log_level = "inof".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidLogLevel("inof".to_string())]
        );

        config.observability.log_level = "WARN".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_all_errors_reported() {
        let mut config = BridgeConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.bridge.root_path = "bad".to_string();
        config.bridge.ws_path = "/ws/".to_string();
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
