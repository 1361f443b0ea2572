//! Configuration management for the log ingest server

use std::env;

use thiserror::Error;

use crate::signature::{SignatureError, SigningKey};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC key shared with upload clients
    pub signing_key: SigningKey,
}

/// Startup configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary name -> value lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let port = match lookup("APP_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "APP_PORT",
                reason: format!("'{}' is not a port number", raw),
            })?,
            None => 3000,
        };

        let signing_key = SigningKey::from_hex(&required("SECRET_KEY")?).map_err(
            |e: SignatureError| ConfigError::Invalid {
                name: "SECRET_KEY",
                reason: e.to_string(),
            },
        )?;

        Ok(Config {
            server: ServerConfig {
                host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
            },
            storage: StorageConfig {
                endpoint: required("DO_SPACES_ENDPOINT")?,
                region: required("DO_SPACES_REGION")?,
                bucket: required("DO_SPACES_BUCKET")?,
                access_key: required("DO_SPACES_ACCESS_KEY")?,
                secret_key: required("DO_SPACES_SECRET_KEY")?,
            },
            auth: AuthConfig { signing_key },
        })
    }
}
