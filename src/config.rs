use std::net::{Ipv4Addr, SocketAddr};
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://football.db?mode=rwc";
const DEFAULT_HOST: Ipv4Addr = Ipv4Addr::LOCALHOST;
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HOST is not in the correct format: {0}")]
    InvalidHost(String),
    #[error("PORT is not the correct format: {0}")]
    InvalidPort(String),
}

/// Process configuration, read once at startup from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: Ipv4Addr,
    pub port: u16,
    /// Base used for absolute pagination links. When unset the request's
    /// `Host` header is used instead.
    pub public_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let host = match lookup("HOST") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidHost(raw))?,
            None => DEFAULT_HOST,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let public_url = lookup("PUBLIC_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        Ok(Config {
            database_url,
            host,
            port,
            public_url,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}
