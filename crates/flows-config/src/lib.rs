pub mod error;

pub use error::*;

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

pub const ENDPOINT_ENV: &str = "FLOWS_ENDPOINT";
pub const TOKEN_ENV: &str = "FLOWS_TOKEN";
pub const CONFIG_PATH_ENV: &str = "FLOWS_CONFIG_PATH";

/// On-disk configuration (`config.json`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Resolved connection settings for the Flows control plane
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    endpoint: String,
    token: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ProviderConfig {
    /// Build a config from explicit values, normalizing the endpoint.
    pub fn new(endpoint: &str, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Ok(Self {
            endpoint: normalize_endpoint(endpoint)?,
            token,
        })
    }

    /// Resolve each field from the explicit value, then the environment,
    /// then the config file.
    pub fn resolve(endpoint: Option<String>, token: Option<String>) -> Result<Self> {
        let mut endpoint = non_empty(endpoint).or_else(|| env_value(ENDPOINT_ENV));
        let mut token = non_empty(token).or_else(|| env_value(TOKEN_ENV));

        if endpoint.is_none() || token.is_none() {
            let file = load_config_file()?;
            endpoint = endpoint.or(non_empty(file.endpoint));
            token = token.or(non_empty(file.token));
        }

        let endpoint = endpoint.ok_or(ConfigError::MissingEndpoint)?;
        let token = token.ok_or(ConfigError::MissingToken)?;

        let config = Self::new(&endpoint, token)?;
        tracing::debug!(endpoint = %config.endpoint, "Resolved provider configuration");
        Ok(config)
    }

    /// Base URL without a trailing slash
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Absolute URL for an API path such as `/provider/flows/get`
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }
}

/// Parse an endpoint, defaulting the scheme to https and dropping a trailing `/`.
///
/// `useflows.eu` becomes `https://useflows.eu`.
pub fn normalize_endpoint(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingEndpoint);
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let invalid = |message: String| ConfigError::InvalidEndpoint {
        endpoint: raw.to_string(),
        message,
    };

    let url = Url::parse(&candidate).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Location of the config file
///
/// 1. `FLOWS_CONFIG_PATH` (must exist)
/// 2. `<config_dir>/flows/config.json` (optional)
pub fn config_file_path() -> Result<Option<PathBuf>> {
    if let Some(path) = env_value(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(ConfigError::ConfigFileNotFound(path));
        }
        return Ok(Some(path));
    }

    Ok(dirs::config_dir()
        .map(|dir| dir.join("flows").join("config.json"))
        .filter(|path| path.exists()))
}

/// Load the config file, or an empty one if there is none.
pub fn load_config_file() -> Result<ConfigFile> {
    match config_file_path()? {
        Some(path) => read_config_file(&path),
        None => Ok(ConfigFile::default()),
    }
}

pub fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)?;
    let file = serde_json::from_str(&content).map_err(|source| ConfigError::ConfigFileParse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(file)
}

fn env_value(key: &str) -> Option<String> {
    non_empty(std::env::var(key).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
