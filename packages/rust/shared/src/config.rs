//! Application configuration for kbsync.
//!
//! User config lives at `~/.kbsync/kbsync.toml`.
//! CLI flags override config file values, which override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{KbSyncError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "kbsync.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".kbsync";

// ---------------------------------------------------------------------------
// Config structs (matching kbsync.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Remote platform settings keyed by environment name (`dev`, `test`, ...).
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut environments = BTreeMap::new();
        environments.insert("dev".to_string(), EnvironmentConfig::default());
        Self {
            defaults: DefaultsConfig::default(),
            environments,
        }
    }
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Maximum in-flight remote calls per record kind.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Derive hierarchical contexts from slash-delimited topics.
    #[serde(default)]
    pub derive_contexts: bool,

    /// Intent rows whose `info` cell starts with this literal are discarded.
    #[serde(default = "default_skip_marker")]
    pub skip_marker: String,

    /// Channel tag written into synonym and answer groups.
    #[serde(default = "default_messaging_service")]
    pub messaging_service: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
            derive_contexts: false,
            skip_marker: default_skip_marker(),
            messaging_service: default_messaging_service(),
        }
    }
}

fn default_concurrency() -> u32 {
    8
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_skip_marker() -> String {
    "SKIP".into()
}
fn default_messaging_service() -> String {
    "georgia".into()
}

/// `[environments.<name>]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Base URL of the platform API (e.g. `https://platform.example.com/v1`).
    pub base_url: String,

    /// Value of the `v` query parameter sent with every call.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Subscription key sent in [`EnvironmentConfig::subscription_key_header`].
    #[serde(default)]
    pub subscription_key: String,

    /// Header carrying the subscription key.
    #[serde(default = "default_subscription_key_header")]
    pub subscription_key_header: String,

    /// Name of the env var holding the bearer token (never store the token itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://platform.example.com/v1".into(),
            api_version: default_api_version(),
            subscription_key: String::new(),
            subscription_key_header: default_subscription_key_header(),
            token_env: default_token_env(),
        }
    }
}

fn default_api_version() -> String {
    "20150910".into()
}
fn default_subscription_key_header() -> String {
    "ocp-apim-subscription-key".into()
}
fn default_token_env() -> String {
    "KBSYNC_TOKEN".into()
}

// ---------------------------------------------------------------------------
// Remote config (runtime, merged from config + environment + CLI flags)
// ---------------------------------------------------------------------------

/// Resolved settings for talking to one remote environment.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Environment name this config was resolved from.
    pub environment: String,
    /// Parsed API base URL.
    pub base_url: Url,
    /// `v` query parameter value.
    pub api_version: String,
    /// Subscription key header name.
    pub subscription_key_header: String,
    /// Subscription key value.
    pub subscription_key: String,
    /// Bearer token.
    pub token: String,
    /// Maximum in-flight calls per record kind.
    pub concurrency: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl RemoteConfig {
    /// Resolve the named environment, reading the bearer token from its env var.
    pub fn resolve(config: &AppConfig, environment: &str) -> Result<Self> {
        let env = lookup_environment(config, environment)?;
        let token = match std::env::var(&env.token_env) {
            Ok(val) if !val.trim().is_empty() => val,
            _ => {
                return Err(KbSyncError::config(format!(
                    "bearer token not found. Set the {} environment variable.",
                    env.token_env
                )));
            }
        };
        Self::with_token(config, environment, token)
    }

    /// Resolve the named environment with an explicitly supplied token.
    pub fn with_token(
        config: &AppConfig,
        environment: &str,
        token: impl Into<String>,
    ) -> Result<Self> {
        let env = lookup_environment(config, environment)?;
        let base_url = Url::parse(&env.base_url).map_err(|e| {
            KbSyncError::config(format!(
                "invalid base_url '{}' for environment '{environment}': {e}",
                env.base_url
            ))
        })?;

        Ok(Self {
            environment: environment.to_string(),
            base_url,
            api_version: env.api_version.clone(),
            subscription_key_header: env.subscription_key_header.clone(),
            subscription_key: env.subscription_key.clone(),
            token: token.into(),
            concurrency: config.defaults.concurrency.max(1) as usize,
            timeout_secs: config.defaults.timeout_secs,
        })
    }
}

fn lookup_environment<'a>(config: &'a AppConfig, name: &str) -> Result<&'a EnvironmentConfig> {
    config.environments.get(name).ok_or_else(|| {
        let known: Vec<&str> = config.environments.keys().map(String::as_str).collect();
        KbSyncError::config(format!(
            "unknown environment '{name}' (configured: {})",
            if known.is_empty() {
                "none".to_string()
            } else {
                known.join(", ")
            }
        ))
    })
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.kbsync/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| KbSyncError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.kbsync/kbsync.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| KbSyncError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| KbSyncError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = config_file_path()?;
    init_config_at(&path)?;
    Ok(path)
}

/// Write a default config file at `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| KbSyncError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| KbSyncError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| KbSyncError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}
