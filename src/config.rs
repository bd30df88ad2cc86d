//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `JWT_SECRET` - HS256 token signing secret
//!
//! ## Optional
//! - `DATABASE_URL` - `PostgreSQL` connection string (absent: in-memory store)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 10)
//! - `HOST` - bind address (default: 0.0.0.0)
//! - `PORT` - listen port (default: 3000)
//! - `TOKEN_TTL_SECS` - token lifetime (default: 3600)
//! - `ACCESS_MODE` - `authenticated` (default) or `shared`
//! - `FALLBACK_ADDRESS_ID` - address promoted first when the delivery address is deleted
//! - `NATS_URL` - NATS server for domain events
//! - `PRODUCTS_SEED_FILE` - JSON product list loaded into an empty catalog

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use uuid::Uuid;

use crate::services::DeliveryFallback;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Whether requests are scoped to an authenticated user or share one global
/// data set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccessMode {
    #[default]
    Authenticated,
    Shared,
}

impl FromStr for AccessMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "authenticated" => Ok(Self::Authenticated),
            "shared" => Ok(Self::Shared),
            other => Err(format!("expected `authenticated` or `shared`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<SecretString>,
    pub db_max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub jwt_secret: SecretString,
    pub token_ttl: Duration,
    pub access_mode: AccessMode,
    pub delivery_fallback: DeliveryFallback,
    pub nats_url: Option<String>,
    pub products_seed_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let fallback_id: Option<Uuid> = parse_optional_env("FALLBACK_ADDRESS_ID")?;
        Ok(Self {
            database_url: get_optional_env("DATABASE_URL").map(SecretString::from),
            db_max_connections: parse_env_or_default("DB_MAX_CONNECTIONS", 10)?,
            host: parse_env_or_default("HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_env_or_default("PORT", 3000)?,
            jwt_secret: get_required_env("JWT_SECRET").map(SecretString::from)?,
            token_ttl: Duration::from_secs(parse_env_or_default("TOKEN_TTL_SECS", 3600)?),
            access_mode: parse_env_or_default("ACCESS_MODE", AccessMode::Authenticated)?,
            delivery_fallback: fallback_id.map_or(DeliveryFallback::OldestRemaining, DeliveryFallback::Preferred),
            nats_url: get_optional_env("NATS_URL"),
            products_seed_file: get_optional_env("PRODUCTS_SEED_FILE").map(PathBuf::from),
        })
    }

    /// Configuration for tests and embedding: in-memory store, defaults
    /// everywhere else.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: None,
            db_max_connections: 10,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            jwt_secret: SecretString::from(jwt_secret.into()),
            token_ttl: Duration::from_secs(3600),
            access_mode: AccessMode::Authenticated,
            delivery_fallback: DeliveryFallback::OldestRemaining,
            nats_url: None,
            products_seed_file: None,
        }
    }

    pub fn with_access_mode(mut self, mode: AccessMode) -> Self {
        self.access_mode = mode;
        self
    }

    pub const fn socket_addr(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    get_optional_env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Unset and blank values both count as absent.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_optional_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key)
        .map(|raw| raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())))
        .transpose()
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_optional_env(key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_mode_parse() {
        assert_eq!("shared".parse::<AccessMode>(), Ok(AccessMode::Shared));
        assert_eq!(" Authenticated ".parse::<AccessMode>(), Ok(AccessMode::Authenticated));
        assert!("open".parse::<AccessMode>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::new("k");
        assert_eq!(config.token_ttl, Duration::from_secs(3600));
        assert_eq!(config.delivery_fallback, DeliveryFallback::OldestRemaining);
        assert_eq!(config.socket_addr().port(), 3000);
    }
}
