use anyhow::anyhow;
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use service_core::error::AppError;
use std::env;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let host = env::var("REGISTRATION_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("REGISTRATION_SERVICE_PORT")
            .unwrap_or_else(|_| "4000".to_string())
            .parse()
            .map_err(|e| {
                AppError::ConfigError(anyhow!("invalid REGISTRATION_SERVICE_PORT: {}", e))
            })?;

        let db_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::ConfigError(anyhow!("DATABASE_URL must be set")))?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|e| {
                AppError::ConfigError(anyhow!("invalid DATABASE_MAX_CONNECTIONS: {}", e))
            })?;
        let min_connections = env::var("DATABASE_MIN_CONNECTIONS")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .map_err(|e| {
                AppError::ConfigError(anyhow!("invalid DATABASE_MIN_CONNECTIONS: {}", e))
            })?;

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: Secret::new(db_url),
                max_connections,
                min_connections,
            },
            service_name: "registration-service".to_string(),
        })
    }
}
