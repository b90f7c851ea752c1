//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the redirect
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::RuleRecord;

/// Root configuration for the redirect service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RedirectConfig {
    /// Front listener configuration.
    pub listener: ListenerConfig,

    /// Rule storage settings.
    pub rules: RulesConfig,

    /// Redirect response settings.
    pub redirect: RedirectResponseConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Rule storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RulesConfig {
    /// JSON file holding the rules. Rules live in memory only when unset.
    pub path: Option<String>,

    /// Reload the rules file when it changes on disk.
    pub watch: bool,

    /// Initial rules, used until the rules file exists.
    pub entries: Vec<RuleRecord>,
}

/// How matched and unmatched requests are answered.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectResponseConfig {
    /// Status code for redirects (301, 302, 303, 307 or 308).
    pub status: u16,

    /// Body returned when no rule matches.
    pub not_found_body: String,
}

impl Default for RedirectResponseConfig {
    fn default() -> Self {
        Self {
            status: 302,
            not_found_body: "Not Found".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

pub const PLACEHOLDER_API_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Validation rejects it when enabled.
            api_key: PLACEHOLDER_API_KEY.to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum admin request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: RedirectConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.redirect.status, 302);
        assert!(config.rules.path.is_none());
        assert!(!config.admin.enabled);
    }

    #[test]
    fn test_full_config() {
        let config: RedirectConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:3000"

            [rules]
            path = "/var/lib/redirect-mapper/rules.json"
            watch = true
            entries = [
                { from = "/old-page/", to = "https://example.com/new-page/" },
                { from = "/legacy" },
            ]

            [redirect]
            status = 301

            [admin]
            enabled = true
            api_key = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
        assert!(config.rules.watch);
        assert_eq!(config.rules.entries.len(), 2);
        assert_eq!(config.rules.entries[1].to, "");
        assert_eq!(config.redirect.status, 301);
        assert_eq!(config.redirect.not_found_body, "Not Found");
        assert_eq!(config.admin.api_key, "secret");
        assert_eq!(config.admin.bind_address, "127.0.0.1:8081");
    }
}
