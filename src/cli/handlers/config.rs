//! Configuration management handler
//!
//! Handles `init` and the `config show|get|set` actions.

use crate::cli::{CliContext, ConfigAction};
use anyhow::{Context, Result};
use std::path::PathBuf;
use umeng_push::config::{Config, ConfigManager};

/// Handler for configuration operations
pub struct ConfigHandler<'a> {
    context: &'a CliContext,
}

impl<'a> ConfigHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    /// Handle configuration initialization
    pub fn handle_init(&self, global: bool, force: bool) -> Result<()> {
        let path = if global {
            None
        } else {
            Some(
                self.context
                    .project_path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(".")),
            )
        };

        let config_path = ConfigManager::get_config_path(path.clone())?;
        let config_exists = config_path.exists();

        if config_exists && !force {
            println!("Configuration already initialized at: {}", config_path.display());
            println!("Use --force to overwrite");
            return Ok(());
        }

        let mut config_manager = match path {
            Some(project) => ConfigManager::new_project_config(project)?,
            None => ConfigManager::new(None)?,
        };
        if force {
            *config_manager.config_mut() = Config::default();
        }
        config_manager
            .save()
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        println!("Configuration initialized successfully at: {}", config_path.display());
        println!("Set credentials with:");
        println!("  umeng-push config set umeng.app_key <APP_KEY>");
        println!("  umeng-push config set umeng.app_master_secret <APP_MASTER_SECRET>");
        Ok(())
    }

    /// Handle configuration management
    pub fn handle_config(&self, action: ConfigAction) -> Result<()> {
        let config_manager = &self.context.config_manager;

        match action {
            ConfigAction::Show => {
                let mut config = config_manager.config().clone();
                if config.umeng.app_master_secret.is_some() {
                    config.umeng.app_master_secret = Some("********".to_string());
                }
                println!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigAction::Set { key, value } => {
                let mut updated = config_manager.clone();
                updated.set(&key, &value)?;
                updated.save()?;
                println!("Configuration updated: {key} = {value}");
            }
            ConfigAction::Get { key } => {
                println!("{}", config_manager.get(&key)?);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_set_writes_the_context_file() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().to_path_buf();
        ConfigManager::new_project_config(project.clone()).unwrap().save().unwrap();

        let context = CliContext::new(Some(project.clone()), false).unwrap();
        let handler = ConfigHandler::new(&context);
        handler
            .handle_config(ConfigAction::Set {
                key: "umeng.send_path".to_string(),
                value: "api/v2/send".to_string(),
            })
            .unwrap();
        handler
            .handle_config(ConfigAction::Get {
                key: "umeng.send_path".to_string(),
            })
            .unwrap();

        let reloaded = ConfigManager::new_project_config(project).unwrap();
        assert_eq!(reloaded.config_path(), context.config_manager.config_path());
        assert_eq!(reloaded.get("umeng.send_path").unwrap(), "/api/v2/send");
    }
}
