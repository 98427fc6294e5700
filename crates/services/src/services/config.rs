//! Runtime configuration read from the environment.

use std::{net::SocketAddr, str::FromStr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://studio.db?mode=rwc";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing Supabase environment variables")]
    MissingSupabase,
    #[error("invalid SUPABASE_URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error("invalid listen address {0}")]
    InvalidAddress(String),
}

/// Where table rows are stored.
#[derive(Debug, Clone)]
pub enum Backend {
    /// Hosted PostgREST-style table API
    Rest { url: Url, anon_key: SecretString },
    /// Local SQLite database
    Sqlite { database_url: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Backend,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend = match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(key)) => Backend::Rest {
                url: Url::parse(&url)?,
                anon_key: SecretString::from(key),
            },
            (None, None) => Backend::Sqlite {
                database_url: get("DATABASE_URL")
                    .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            },
            _ => return Err(ConfigError::MissingSupabase),
        };

        let port = match get("PORT") {
            Some(port) => u16::from_str(&port).map_err(|_| ConfigError::InvalidPort(port))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            backend,
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}
