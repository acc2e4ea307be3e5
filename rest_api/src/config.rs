// rest_api/src/config.rs

use std::env;

use anyhow::Result;
use serde::Deserialize;

/// Represents the configuration for the admin API server itself.
#[derive(Debug, Deserialize)]
pub struct RestApiConfig {
    pub port: u16,
    pub host: String,
}

/// Loads the server configuration from the environment, falling back to
/// the defaults the deployment scripts assume.
pub fn load_rest_api_config() -> Result<RestApiConfig> {
    let port = match env::var("HOSPITAL_ADMIN_PORT") {
        Ok(raw) => raw
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("Invalid HOSPITAL_ADMIN_PORT '{}': {}", raw, e))?,
        Err(_) => 8082,
    };
    let host = env::var("HOSPITAL_ADMIN_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    Ok(RestApiConfig { port, host })
}
