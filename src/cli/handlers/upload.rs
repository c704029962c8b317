//! Upload handler
//!
//! Uploads a file of aliases or device tokens and prints the returned
//! file_id for use with `send --file-id`.

use crate::cli::{CliContext, CredentialArgs};
use super::resolve_credentials;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use umeng_push::clients::create_async_client_from_umeng_config;

/// Handler for upload operations
pub struct UploadHandler<'a> {
    context: &'a CliContext,
}

impl<'a> UploadHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub async fn handle_upload(&self, credentials: CredentialArgs, file: PathBuf) -> Result<()> {
        let (app_key, app_master_secret) = resolve_credentials(self.context, credentials)?;
        let content = fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;

        let client = create_async_client_from_umeng_config(&self.context.config_manager.config().umeng)?;
        let file_id = client
            .upload(&app_key, &app_master_secret, content.trim_end())
            .await
            .context("Failed to upload file")?;

        println!("{file_id}");
        Ok(())
    }
}
