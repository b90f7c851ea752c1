//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, status codes and value ranges
//! - Refuse to expose the admin API with a placeholder key
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedirectConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::{RedirectConfig, PLACEHOLDER_API_KEY};

/// Redirect status codes the service may emit.
pub const REDIRECT_STATUSES: &[u16] = &[301, 302, 303, 307, 308];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &RedirectConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let listener = check_address(
        &mut errors,
        "listener.bind_address",
        &config.listener.bind_address,
    );

    if !REDIRECT_STATUSES.contains(&config.redirect.status) {
        errors.push(ValidationError::new(
            "redirect.status",
            format!(
                "{} is not a redirect status (expected one of {:?})",
                config.redirect.status, REDIRECT_STATUSES
            ),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.rules.watch && config.rules.path.is_none() {
        errors.push(ValidationError::new("rules.watch", "requires rules.path"));
    }

    if matches!(config.rules.path.as_deref(), Some(p) if p.trim().is_empty()) {
        errors.push(ValidationError::new("rules.path", "must not be empty"));
    }

    if config.admin.enabled {
        let key = config.admin.api_key.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            errors.push(ValidationError::new(
                "admin.api_key",
                "must be set to a non-placeholder value when the admin API is enabled",
            ));
        }

        let admin = check_address(&mut errors, "admin.bind_address", &config.admin.bind_address);
        if let (Some(listener), Some(admin)) = (listener, admin) {
            if listener == admin && listener.port() != 0 {
                errors.push(ValidationError::new(
                    "admin.bind_address",
                    "must differ from listener.bind_address",
                ));
            }
        }

        if config.security.max_body_size == 0 {
            errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
        }
    }

    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(
    errors: &mut Vec<ValidationError>,
    field: &'static str,
    value: &str,
) -> Option<SocketAddr> {
    match value.parse() {
        Ok(addr) => Some(addr),
        Err(_) => {
            errors.push(ValidationError::new(
                field,
                format!("'{value}' is not a valid socket address"),
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RedirectConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RedirectConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.redirect.status = 200;
        config.timeouts.request_secs = 0;
        config.rules.watch = true;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "redirect.status",
                "timeouts.request_secs",
                "rules.watch",
            ]
        );
    }

    #[test]
    fn test_admin_requires_real_key() {
        let mut config = RedirectConfig::default();
        config.admin.enabled = true;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "admin.api_key");

        config.admin.api_key = "s3cret".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_admin_and_listener_must_not_collide() {
        let mut config = RedirectConfig::default();
        config.admin.enabled = true;
        config.admin.api_key = "s3cret".into();
        config.admin.bind_address = config.listener.bind_address.clone();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "admin.bind_address");
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = RedirectConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }
}
