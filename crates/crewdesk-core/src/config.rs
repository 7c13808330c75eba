//! Configuration module
//!
//! This module provides the application configuration, loaded from environment
//! variables. Gateway endpoints (OmniStack CRM, identity provider) are global;
//! the OmniStack API key itself is stored per client in the database.

use std::env;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const GATEWAY_TIMEOUT_SECS: u64 = 30;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Service-to-service API key protecting `/api`. When unset, auth is disabled.
    pub service_api_key: Option<String>,
    /// Base URL of the OmniStack CRM gateway.
    pub omnistack_base_url: String,
    /// Base URL of the identity provider admin API.
    pub identity_base_url: String,
    /// Service-role key for the identity provider admin API.
    pub identity_service_key: Option<String>,
    /// Timeout applied to outbound gateway calls, in seconds.
    pub gateway_timeout_seconds: u64,
    pub http_concurrency_limit: usize,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

        Ok(Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            cors_origins: parse_csv(&cors_origins_str),
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            service_api_key: env::var("SERVICE_API_KEY").ok().filter(|s| !s.is_empty()),
            omnistack_base_url: env::var("OMNISTACK_BASE_URL")
                .unwrap_or_else(|_| "https://api.omnistack.example.com".to_string()),
            identity_base_url: env::var("IDENTITY_BASE_URL")
                .unwrap_or_else(|_| "https://identity.example.com".to_string()),
            identity_service_key: env::var("IDENTITY_SERVICE_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
            gateway_timeout_seconds: env::var("GATEWAY_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(GATEWAY_TIMEOUT_SECS),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
        })
    }

    /// Fail fast on configuration that cannot work at runtime.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.database_url.is_empty() {
            anyhow::bail!("DATABASE_URL must not be empty");
        }
        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        for url in [&self.omnistack_base_url, &self.identity_base_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("Gateway base URL must be http(s): {}", url);
            }
        }
        if self.is_production() && self.service_api_key.is_none() {
            tracing::warn!("SERVICE_API_KEY is unset in production; /api is unauthenticated");
        }
        Ok(())
    }
}

fn parse_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            server_port: 8080,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            database_url: "postgres://localhost/crewdesk".to_string(),
            db_max_connections: 5,
            db_timeout_seconds: 30,
            service_api_key: None,
            omnistack_base_url: "https://api.omnistack.example.com".to_string(),
            identity_base_url: "https://identity.example.com".to_string(),
            identity_service_key: None,
            gateway_timeout_seconds: 30,
            http_concurrency_limit: 100,
        }
    }

    #[test]
    fn test_parse_csv() {
        assert_eq!(parse_csv("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_csv(""), Vec::<String>::new());
        assert_eq!(parse_csv("*"), vec!["*"]);
    }

    #[test]
    fn test_is_production() {
        let mut config = test_config();
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
        config.environment = "prod".to_string();
        assert!(config.is_production());
    }

    #[test]
    fn test_validate_rejects_bad_gateway_url() {
        let mut config = test_config();
        config.omnistack_base_url = "ftp://nope".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(test_config().validate().is_ok());
    }
}
