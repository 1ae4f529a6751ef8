//! Configuration loading from environment.

use std::env;
use std::time::Duration;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub session_ttl: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let session_ttl_secs: u64 = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| "1800".to_string())
            .parse()?;

        Ok(Self {
            port,
            database_url,
            session_ttl: Duration::from_secs(session_ttl_secs),
        })
    }
}
