use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_MODEL, DEFAULT_SERVER_URL, GREETING_DELAY_MS, GREETING_TEXT,
    HTTP_REQUEST_TIMEOUT_SECS,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Answering service connection
    #[serde(default)]
    pub server: ServerConfig,

    /// Conversation settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,
}

/// Answering service connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL; `/chat` and `/list-sources` are resolved against it
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Conversation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Model identifier sent with every question
    pub model: String,
    /// First assistant message
    pub greeting: String,
    /// Delay before the greeting shows up
    pub greeting_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            greeting: GREETING_TEXT.to_string(),
            greeting_delay_ms: GREETING_DELAY_MS,
        }
    }
}

impl ChatConfig {
    pub fn greeting_delay(&self) -> Duration {
        Duration::from_millis(self.greeting_delay_ms)
    }
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UIConfig {
    /// Show the source selector panel
    pub show_sources: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self { show_sources: true }
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(".sourcechat/config.toml");
    load_config_from(&[global_config, local_config])
}

/// Merge defaults, the given TOML files (later wins) and `SOURCECHAT_` env vars
pub fn load_config_from(files: &[PathBuf]) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    for file in files {
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }
    }

    // Nested keys use a double underscore: SOURCECHAT_SERVER__BASE_URL
    figment = figment.merge(Env::prefixed("SOURCECHAT_").split("__"));

    figment
        .extract()
        .context("Failed to load configuration")
}

/// Load a single explicit config file on top of the defaults
pub fn load_config_file(path: &Path) -> Result<Config> {
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::string(&toml_str))
        .extract()
        .with_context(|| format!("Invalid config {}", path.display()))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "sourcechat") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("sourcechat");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<PathBuf> {
    let config_file = get_config_dir()?.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
    }

    Ok(config_file)
}
