//! Command handlers for all CLI operations
//!
//! This module routes parsed commands to their handlers, keeping CLI parsing
//! separate from the work each command does.

pub mod config;
pub mod send;
pub mod upload;

use crate::cli::{CliContext, Commands, CredentialArgs};
use anyhow::{Context, Result};
use umeng_push::signer;

use config::ConfigHandler;
use send::SendHandler;
use upload::UploadHandler;

/// Coordinates command handling with dependencies injected via CliContext
pub struct CommandHandler {
    context: CliContext,
}

impl CommandHandler {
    pub fn new(context: CliContext) -> Self {
        Self { context }
    }

    /// Route commands to their appropriate handlers
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Init { global, force } => {
                ConfigHandler::new(&self.context).handle_init(global, force)
            }
            Commands::Config { action } => ConfigHandler::new(&self.context).handle_config(action),
            Commands::Send { platform } => SendHandler::new(&self.context).handle_send(platform).await,
            Commands::Upload { credentials, file } => {
                UploadHandler::new(&self.context)
                    .handle_upload(credentials, file)
                    .await
            }
            Commands::Sign {
                url,
                body,
                secret,
                method,
            } => {
                let signature = signer::sign(&method, &url, &body, &secret);
                println!("{signature}");
                println!("{}", signer::signed_url(&url, &signature));
                Ok(())
            }
        }
    }
}

/// Credentials from flags or environment, falling back to the configuration file
pub(crate) fn resolve_credentials(context: &CliContext, args: CredentialArgs) -> Result<(String, String)> {
    let umeng = &context.config_manager.config().umeng;

    let app_key = args
        .app_key
        .or_else(|| umeng.app_key.clone())
        .filter(|key| !key.is_empty())
        .context("No app key: pass --app-key, set UMENG_APP_KEY or umeng.app_key")?;

    let app_master_secret = args
        .app_master_secret
        .or_else(|| umeng.app_master_secret.clone())
        .filter(|secret| !secret.is_empty())
        .context(
            "No app master secret: pass --app-master-secret, set UMENG_APP_MASTER_SECRET or umeng.app_master_secret",
        )?;

    Ok((app_key, app_master_secret))
}
