use crate::clients::umeng::{DEFAULT_HOST, DEFAULT_SEND_PATH, DEFAULT_TIMEOUT_SECS, DEFAULT_UPLOAD_PATH};
use crate::errors::{PushError, PushResult};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding the configuration file, relative to a project or home
pub const CONFIG_DIR: &str = ".umeng-push";

/// Keys accepted by [`ConfigManager::get`] and [`ConfigManager::set`]
pub const CONFIG_KEYS: &[&str] = &[
    "umeng.host",
    "umeng.upload_path",
    "umeng.send_path",
    "umeng.timeout_secs",
    "umeng.app_key",
    "umeng.app_master_secret",
    "umeng.production_mode",
    "logging.level",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub umeng: UmengConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Push service endpoint and default credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UmengConfig {
    pub host: String,
    pub upload_path: String,
    pub send_path: String,
    pub timeout_secs: Option<u64>,
    pub app_key: Option<String>,
    pub app_master_secret: Option<String>,
    /// Sent as `production_mode`; `false` targets test devices
    pub production_mode: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for UmengConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
            send_path: DEFAULT_SEND_PATH.to_string(),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            app_key: None,
            app_master_secret: None,
            production_mode: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration manager for the push client
///
/// # Configuration Hierarchy
///
/// 1. **Project-level**: `.umeng-push/config.toml` in the project root
/// 2. **Global**: `~/.umeng-push/config.toml` in the user home directory
///
/// # Example
///
/// ```rust,no_run
/// use umeng_push::config::ConfigManager;
/// use std::path::PathBuf;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config_manager = ConfigManager::new(Some(PathBuf::from("/path/to/project")))?;
///     println!("Send URL host: {}", config_manager.config().umeng.host);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Load the project config if present, else the global one, else
    /// defaults bound to the project file (global when no project path is given)
    pub fn new(project_path: Option<PathBuf>) -> PushResult<Self> {
        if let Some(ref path) = project_path {
            let project_config_path = Self::get_config_path(Some(path.clone()))?;
            if project_config_path.exists() {
                return Self::open(project_config_path);
            }

            let global_config_path = Self::get_config_path(None)?;
            if global_config_path.exists() {
                return Self::open(global_config_path);
            }

            Self::open(project_config_path)
        } else {
            Self::open(Self::get_config_path(None)?)
        }
    }

    /// Always use the project-level file, even if a global one exists
    pub fn new_project_config(project_path: PathBuf) -> PushResult<Self> {
        Self::open(Self::get_config_path(Some(project_path))?)
    }

    /// Load the configuration at an explicit file path; a missing file
    /// yields defaults and is only written by [`save`](Self::save)
    pub fn open(config_path: PathBuf) -> PushResult<Self> {
        let config = Self::load(&config_path)?;
        Ok(ConfigManager { config_path, config })
    }

    pub fn get_config_path(project_path: Option<PathBuf>) -> PushResult<PathBuf> {
        let base_path = if let Some(path) = project_path {
            path.join(CONFIG_DIR)
        } else {
            let base_dirs =
                BaseDirs::new().ok_or_else(|| PushError::config("Failed to get base directories"))?;
            base_dirs.home_dir().join(CONFIG_DIR)
        };

        Ok(base_path.join("config.toml"))
    }

    fn load(path: &Path) -> PushResult<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| PushError::io_with_source(path, "read config file", e))?;
        Ok(toml::from_str(&content)?)
    }

    /// Write the configuration back to the file it was loaded from
    pub fn save(&self) -> PushResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| PushError::io_with_source(parent, "create config directory", e))?;
        }
        let content = toml::to_string_pretty(&self.config)
            .map_err(|e| PushError::config_with_source("Failed to serialize config", e))?;
        fs::write(&self.config_path, content)
            .map_err(|e| PushError::io_with_source(&self.config_path, "write config file", e))?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Read a dotted key; unset optional values read as an empty string
    pub fn get(&self, key: &str) -> PushResult<String> {
        let umeng = &self.config.umeng;
        let value = match key {
            "umeng.host" => umeng.host.clone(),
            "umeng.upload_path" => umeng.upload_path.clone(),
            "umeng.send_path" => umeng.send_path.clone(),
            "umeng.timeout_secs" => umeng.timeout_secs.map(|t| t.to_string()).unwrap_or_default(),
            "umeng.app_key" => umeng.app_key.clone().unwrap_or_default(),
            "umeng.app_master_secret" => umeng.app_master_secret.clone().unwrap_or_default(),
            "umeng.production_mode" => umeng.production_mode.map(|p| p.to_string()).unwrap_or_default(),
            "logging.level" => self.config.logging.level.clone(),
            _ => return Err(PushError::config(format!("Unknown configuration key: {key}"))),
        };
        Ok(value)
    }

    /// Set a dotted key in memory; an empty value clears optional keys.
    /// Call [`save`](Self::save) to persist.
    pub fn set(&mut self, key: &str, value: &str) -> PushResult<()> {
        let invalid = || PushError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let optional = |value: &str| (!value.is_empty()).then(|| value.to_string());

        let umeng = &mut self.config.umeng;
        match key {
            "umeng.host" => {
                url::Url::parse(value).map_err(|_| invalid())?;
                umeng.host = value.trim_end_matches('/').to_string();
            }
            "umeng.upload_path" => umeng.upload_path = normalize_path(value),
            "umeng.send_path" => umeng.send_path = normalize_path(value),
            "umeng.timeout_secs" => {
                umeng.timeout_secs = if value.is_empty() {
                    None
                } else {
                    Some(value.parse().map_err(|_| invalid())?)
                }
            }
            "umeng.app_key" => umeng.app_key = optional(value),
            "umeng.app_master_secret" => umeng.app_master_secret = optional(value),
            "umeng.production_mode" => {
                umeng.production_mode = if value.is_empty() {
                    None
                } else {
                    Some(value.parse().map_err(|_| invalid())?)
                }
            }
            "logging.level" => {
                value.parse::<tracing::Level>().map_err(|_| invalid())?;
                self.config.logging.level = value.to_lowercase();
            }
            _ => return Err(PushError::config(format!("Unknown configuration key: {key}"))),
        }
        Ok(())
    }
}

fn normalize_path(value: &str) -> String {
    if value.starts_with('/') {
        value.to_string()
    } else {
        format!("/{value}")
    }
}
