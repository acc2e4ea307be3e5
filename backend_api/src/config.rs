// backend_api/src/config.rs

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Project base URL; tables live under `{base_url}/rest/v1/`.
    pub base_url: String,
    /// Project API key, sent as the `apikey` header on every request.
    pub api_key: String,
    /// Bearer token of the signed-in user. Falls back to the api key when
    /// absent, which means service-level access with no acting user.
    #[serde(default)]
    pub access_token: Option<String>,
}

// Matches the 'backend:' key in backend_config.yaml.
#[derive(Debug, Deserialize)]
struct BackendConfigWrapper {
    backend: BackendConfig,
}

/// Loads backend settings from `backend_config.yaml` (or the given path),
/// then applies `HOSPITAL_BACKEND_URL` / `HOSPITAL_BACKEND_KEY` /
/// `HOSPITAL_BACKEND_TOKEN` environment overrides on top.
pub fn load_backend_config(config_file_path: Option<PathBuf>) -> Result<BackendConfig> {
    let path = config_file_path.unwrap_or_else(|| PathBuf::from("backend_config.yaml"));

    let mut config = if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read backend config file {}", path.display()))?;
        let wrapper: BackendConfigWrapper = serde_yaml2::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse backend config file {}: {}", path.display(), e)
        })?;
        wrapper.backend
    } else {
        BackendConfig {
            base_url: String::new(),
            api_key: String::new(),
            access_token: None,
        }
    };

    if let Ok(url) = env::var("HOSPITAL_BACKEND_URL") {
        config.base_url = url;
    }
    if let Ok(key) = env::var("HOSPITAL_BACKEND_KEY") {
        config.api_key = key;
    }
    if let Ok(token) = env::var("HOSPITAL_BACKEND_TOKEN") {
        config.access_token = Some(token);
    }

    if config.base_url.is_empty() {
        anyhow::bail!(
            "backend base_url is not configured (backend_config.yaml or HOSPITAL_BACKEND_URL)"
        );
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::load_backend_config;
    use std::path::PathBuf;

    #[test]
    fn environment_overrides_a_missing_file() {
        unsafe {
            std::env::set_var("HOSPITAL_BACKEND_URL", "https://demo.example.co");
            std::env::set_var("HOSPITAL_BACKEND_KEY", "anon-key");
        }
        let config =
            load_backend_config(Some(PathBuf::from("no_such_backend_config.yaml"))).unwrap();
        assert_eq!(config.base_url, "https://demo.example.co");
        assert_eq!(config.api_key, "anon-key");
        unsafe {
            std::env::remove_var("HOSPITAL_BACKEND_URL");
            std::env::remove_var("HOSPITAL_BACKEND_KEY");
        }
    }
}
