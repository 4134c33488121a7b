//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Lifetime of cached category/tag lists in seconds (default: 300).
    pub lookup_cache_ttl_secs: u64,

    /// Salt mixed into synthesized recipe ratings (default: "pantry").
    pub rating_salt: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let cors_allowed_origins = parse_origins(env::var("CORS_ALLOWED_ORIGINS").ok());

        let lookup_cache_ttl_secs = env::var("LOOKUP_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .context("LOOKUP_CACHE_TTL_SECS must be a valid u64")?;

        let rating_salt = env::var("RATING_SALT").unwrap_or_else(|_| "pantry".to_string());

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            cors_allowed_origins,
            lookup_cache_ttl_secs,
            rating_salt,
        })
    }

    /// Configuration for tests and embedded use: no database URL, defaults elsewhere.
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            database_url: String::new(),
            database_max_connections: 1,
            cors_allowed_origins: vec!["*".to_string()],
            lookup_cache_ttl_secs: 300,
            rating_salt: "pantry".to_string(),
        }
    }
}

fn parse_origins(raw: Option<String>) -> Vec<String> {
    raw.map(|v| {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
    })
    .filter(|origins| !origins.is_empty())
    .unwrap_or_else(|| vec!["*".to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_default_to_wildcard() {
        assert_eq!(parse_origins(None), vec!["*"]);
        assert_eq!(parse_origins(Some(" , ".into())), vec!["*"]);
    }

    #[test]
    fn origins_are_trimmed() {
        assert_eq!(
            parse_origins(Some("https://a.test, https://b.test".into())),
            vec!["https://a.test", "https://b.test"]
        );
    }
}
