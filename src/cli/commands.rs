//! Command definitions and structures for the CLI
//!
//! This module contains the clap-based command line argument definitions,
//! including the main CLI structure and all subcommands.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "umeng-push")]
#[command(about = "Umeng push notification client for Android and iOS")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project path for project-level configuration
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize configuration
    Init {
        /// Initialize global configuration (default is project-level)
        #[arg(short, long)]
        global: bool,

        /// Overwrite an existing configuration with defaults
        #[arg(short, long)]
        force: bool,
    },

    /// Configure settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Send a customizedcast notification
    Send {
        #[command(subcommand)]
        platform: Platform,
    },

    /// Upload a file of aliases or device tokens and print its file_id
    Upload {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// File with one alias or device token per line
        file: PathBuf,
    },

    /// Compute the request signature for a method, URL, body and secret
    Sign {
        /// Full URL without the sign parameter
        #[arg(long)]
        url: String,

        /// Request body exactly as it will be posted
        #[arg(long)]
        body: String,

        /// App master secret
        #[arg(long, env = "UMENG_APP_MASTER_SECRET", hide_env_values = true)]
        secret: String,

        /// HTTP method
        #[arg(long, default_value = "POST")]
        method: String,
    },
}

/// Configuration management actions
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Configuration key (e.g., umeng.host)
        key: String,
        /// Value to set; empty clears optional keys
        value: String,
    },

    /// Get configuration value
    Get {
        /// Configuration key
        key: String,
    },
}

/// Target platform for `send`
#[derive(Subcommand)]
pub enum Platform {
    /// Android notification or silent message
    Android {
        #[command(flatten)]
        common: SendArgs,

        /// notification or message
        #[arg(long, default_value = "notification")]
        display_type: String,

        /// Status bar ticker
        #[arg(long, default_value = "")]
        ticker: String,

        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, default_value = "")]
        text: String,

        /// go_app, go_url, go_activity or go_custom
        #[arg(long, default_value = "go_app")]
        after_open: String,

        #[arg(long, default_value = "")]
        url: String,

        #[arg(long, default_value = "")]
        activity: String,

        /// Custom content; parsed as JSON when possible, else sent as a string
        #[arg(long)]
        custom: Option<String>,

        /// Extra key=value pairs delivered to the app
        #[arg(long = "extra", value_parser = parse_key_val)]
        extra: Vec<(String, String)>,

        /// Deduplication key
        #[arg(long)]
        out_biz_no: Option<String>,
    },

    /// iOS notification
    Ios {
        #[command(flatten)]
        common: SendArgs,

        /// Alert text
        #[arg(long)]
        alert: String,

        #[arg(long)]
        badge: Option<String>,

        #[arg(long)]
        sound: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Set content-available to 1 for background updates
        #[arg(long)]
        content_available: bool,

        /// Extra top-level payload key=value pairs
        #[arg(long = "field", value_parser = parse_key_val)]
        fields: Vec<(String, String)>,

        /// apns-collapse-id policy value
        #[arg(long)]
        collapse_id: Option<String>,
    },
}

/// App credentials; fall back to the `[umeng]` configuration section
#[derive(Args)]
pub struct CredentialArgs {
    #[arg(long, env = "UMENG_APP_KEY")]
    pub app_key: Option<String>,

    #[arg(long, env = "UMENG_APP_MASTER_SECRET", hide_env_values = true)]
    pub app_master_secret: Option<String>,
}

/// Arguments shared by every platform's send
#[derive(Args)]
pub struct SendArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Alias type registered by the app SDK
    #[arg(long)]
    pub alias_type: String,

    /// Comma-separated aliases
    #[arg(long, default_value = "")]
    pub alias: String,

    /// file_id returned by `upload`
    #[arg(long, default_value = "")]
    pub file_id: String,

    /// Target production devices (true) or test devices (false)
    #[arg(long)]
    pub production_mode: Option<bool>,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Policy expire_time, e.g. "2026-10-20 12:00:00"
    #[arg(long)]
    pub expire_time: Option<String>,

    /// Policy max_send_num
    #[arg(long)]
    pub max_send_num: Option<u32>,

    /// Print the signed request instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}
