//! Environment-driven server configuration

use std::net::SocketAddr;

/// Server configuration, read from the environment at process start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000)
    pub bind_addr: SocketAddr,

    /// SQLite connection string
    pub database_url: String,

    /// HS256 signing secret for JWT tokens
    pub secret_key: String,

    /// Allowed CORS origins
    pub cors_origins: Vec<String>,

    /// Environment name ("development", "production", ...)
    pub environment: String,

    /// Debug mode: permissive CORS, noisier defaults
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            database_url: "sqlite://cafes.db".to_owned(),
            secret_key: "change-me".to_owned(),
            cors_origins: vec!["http://localhost:63343".to_owned()],
            environment: "development".to_owned(),
            debug: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `CAFELIST_*` environment variables,
    /// falling back to development defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = std::env::var("CAFELIST_BIND_ADDR")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.bind_addr);

        let database_url =
            std::env::var("CAFELIST_DATABASE_URL").unwrap_or(defaults.database_url);

        let secret_key = std::env::var("CAFELIST_SECRET_KEY").unwrap_or_else(|_| {
            tracing::warn!("CAFELIST_SECRET_KEY not set, using development default");
            defaults.secret_key
        });

        let cors_origins = std::env::var("CAFELIST_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_owned())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        let environment = std::env::var("CAFELIST_ENV").unwrap_or(defaults.environment);

        let debug = std::env::var("CAFELIST_DEBUG")
            .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
            .unwrap_or(environment == "development");

        Self {
            bind_addr,
            database_url,
            secret_key,
            cors_origins,
            environment,
            debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8000);
        assert!(config.debug);
        assert_eq!(config.environment, "development");
        assert_eq!(config.cors_origins.len(), 1);
    }
}
