//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the bind address shape and port
//! - Validate value ranges and the log level
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::AppConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}: expected host:port or :port")]
    InvalidBindAddress(String),

    #[error("limits.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_valid_bind_address(&config.listener.bind_address) {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

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

fn is_valid_bind_address(address: &str) -> bool {
    let Some((host, port)) = address.rsplit_once(':') else {
        return false;
    };
    if host.contains(char::is_whitespace) {
        return false;
    }
    port.parse::<u16>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn test_bind_address_forms() {
        for ok in [":4000", "127.0.0.1:4000", "localhost:80", "[::1]:4000"] {
            assert!(is_valid_bind_address(ok), "{ok}");
        }
        for bad in ["4000", ":http", "localhost:", "localhost:70000", "a b:80"] {
            assert!(!is_valid_bind_address(bad), "{bad}");
        }
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.limits.max_body_size = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBindAddress("nowhere".into()),
                ValidationError::ZeroBodyLimit,
                ValidationError::InvalidLogLevel("loud".into()),
            ]
        );
    }
}
