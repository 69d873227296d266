//! Runtime configuration for the webhook binary.
//!
//! Values come from environment variables, falling back to the defaults
//! below. [`WebhookConfig::from_lookup`] takes the lookup as a closure so
//! parsing can be exercised without touching the process environment.

use std::path::PathBuf;

use thiserror::Error;

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;
/// Default health server port
pub const HEALTH_PORT: u16 = 8080;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A port variable is not a valid TCP port
    #[error("invalid value {value:?} for {name}: {source}")]
    InvalidPort {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Webhook binary configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebhookConfig {
    /// TLS certificate (PEM), `WEBHOOK_CERT_PATH`
    pub cert_path: PathBuf,
    /// TLS private key (PEM), `WEBHOOK_KEY_PATH`
    pub key_path: PathBuf,
    /// Webhook listening port, `WEBHOOK_PORT`
    pub webhook_port: u16,
    /// Health/metrics listening port, `HEALTH_PORT`
    pub health_port: u16,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from(WEBHOOK_CERT_PATH),
            key_path: PathBuf::from(WEBHOOK_KEY_PATH),
            webhook_port: WEBHOOK_PORT,
            health_port: HEALTH_PORT,
        }
    }
}

impl WebhookConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration using `lookup` to resolve variable names
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            cert_path: lookup("WEBHOOK_CERT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.cert_path),
            key_path: lookup("WEBHOOK_KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.key_path),
            webhook_port: parse_port(&lookup, "WEBHOOK_PORT", defaults.webhook_port)?,
            health_port: parse_port(&lookup, "HEALTH_PORT", defaults.health_port)?,
        })
    }

    /// Whether both TLS files exist on disk
    pub fn tls_files_present(&self) -> bool {
        self.cert_path.exists() && self.key_path.exists()
    }
}

fn parse_port<F>(lookup: &F, name: &'static str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidPort {
                name,
                value,
                source,
            }),
    }
}
