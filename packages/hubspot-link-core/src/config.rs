//! Backend endpoint configuration.
//!
//! The integration backend URL is resolved with priority:
//! 1. Environment variable (`HUBSPOT_LINK_API_URL`)
//! 2. Config file (`~/.config/hubspot-link/config.toml`)
//! 3. Default local development address

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default backend URL (local development server)
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Environment variable name for backend URL override
pub const ENV_API_URL: &str = "HUBSPOT_LINK_API_URL";

/// Configuration file structure
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    backend: Option<BackendConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct BackendConfig {
    /// Integration backend URL (e.g., "https://integrations.example.com")
    api_url: Option<String>,
}

/// Runtime backend configuration
#[derive(Debug, Clone)]
pub struct IntegrationConfig {
    /// Base URL for backend calls, without a trailing slash
    pub api_url: String,
    /// Source of the configuration (for logging)
    pub source: ConfigSource,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            source: ConfigSource::Default,
        }
    }
}

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Using default hardcoded values
    Default,
    /// Loaded from environment variable
    Environment,
    /// Loaded from config file
    ConfigFile,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::ConfigFile => write!(f, "config file"),
        }
    }
}

/// Trim whitespace and trailing slashes; blank values count as unset
pub(crate) fn normalize_url(url: &str) -> Option<String> {
    let url = url.trim().trim_end_matches('/');
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

/// Get the path to the configuration file
fn get_config_file_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|p| p.join("hubspot-link").join("config.toml"))
}

/// Load configuration from a specific file, returning None if it is missing or invalid
pub fn load_config_file_from(path: &Path) -> Option<ConfigFile> {
    if !path.exists() {
        return None;
    }

    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file {:?}: {}", path, e);
            None
        }
    }
}

/// Resolve the backend configuration from an environment value and a parsed config file
pub fn resolve_integration_config(
    env_value: Option<String>,
    file: Option<ConfigFile>,
) -> IntegrationConfig {
    // Priority 1: Environment variable
    if let Some(url) = env_value.as_deref().and_then(normalize_url) {
        tracing::info!("Using backend URL from environment variable: {}", url);
        return IntegrationConfig {
            api_url: url,
            source: ConfigSource::Environment,
        };
    }

    // Priority 2: Config file
    let file_url = file
        .and_then(|config| config.backend)
        .and_then(|backend| backend.api_url)
        .and_then(|url| normalize_url(&url));

    if let Some(url) = file_url {
        tracing::info!("Using backend URL from config file: {}", url);
        return IntegrationConfig {
            api_url: url,
            source: ConfigSource::ConfigFile,
        };
    }

    // Priority 3: Default values
    tracing::debug!("Using default backend URL: {}", DEFAULT_API_URL);
    IntegrationConfig::default()
}

/// Load backend configuration from the process environment and the user config file
pub fn load_integration_config() -> IntegrationConfig {
    load_integration_config_with(|name| std::env::var(name).ok(), get_config_file_path())
}

/// Load backend configuration with an explicit variable lookup and config file path
pub fn load_integration_config_with<F>(
    lookup: F,
    config_path: Option<PathBuf>,
) -> IntegrationConfig
where
    F: Fn(&str) -> Option<String>,
{
    let env_value = lookup(ENV_API_URL);
    let file = config_path.and_then(|path| load_config_file_from(&path));
    resolve_integration_config(env_value, file)
}

/// Get the path to the config file for documentation purposes
pub fn get_config_file_path_string() -> String {
    get_config_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/hubspot-link/config.toml".to_string())
}

/// Generate example config file content
pub fn generate_example_config() -> String {
    r#"# hubspot-link Configuration
# Place this file at: ~/.config/hubspot-link/config.toml

[backend]
# Integration backend that runs the HubSpot OAuth flow
# Default: http://localhost:5000
# api_url = "https://integrations.example.com"
"#
    .to_string()
}
