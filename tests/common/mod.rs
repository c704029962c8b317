//! Common test utilities and helpers

#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;
use umeng_push::notification::{AndroidNotification, DisplayType, IosAps, IosNotification};
use umeng_push::{AsyncUmengClient, UmengClientConfig};

pub const APP_KEY: &str = "umeng-app-key";
pub const APP_MASTER_SECRET: &str = "umeng-app-master-secret";

/// Isolated home and project directories for one CLI run
pub struct TestEnvironment {
    pub home: TempDir,
    pub project: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().expect("Failed to create temp home"),
            project: TempDir::new().expect("Failed to create temp project"),
        }
    }

    pub fn project_path(&self) -> &Path {
        self.project.path()
    }

    /// `umeng-push --project <project>` with HOME redirected and credentials cleared
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("umeng-push").expect("Failed to find umeng-push binary");
        cmd.env("HOME", self.home.path())
            .env_remove("UMENG_APP_KEY")
            .env_remove("UMENG_APP_MASTER_SECRET")
            .env_remove("RUST_LOG")
            .arg("--project")
            .arg(self.project.path());
        cmd
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

/// Client pointed at a mock server
pub fn client_for(host: &str) -> AsyncUmengClient {
    AsyncUmengClient::new(UmengClientConfig {
        host: host.to_string(),
        ..Default::default()
    })
    .expect("Failed to create client")
}

/// Android silent message targeting alias 123 of type grp
pub fn android_message() -> AndroidNotification {
    let mut notification = AndroidNotification::new(APP_KEY, APP_MASTER_SECRET);
    notification.base.alias_type = "grp".to_string();
    notification.base.alias = "123".to_string();
    notification.payload.set_display_type(DisplayType::Message);
    notification.payload.body.custom = Some(json!({"k": "v"}));
    notification
}

/// iOS alert targeting alias 30000372 of type uid
pub fn ios_alert() -> IosNotification {
    let mut notification = IosNotification::new(APP_KEY, APP_MASTER_SECRET);
    notification.base.alias_type = "uid".to_string();
    notification.base.alias = "30000372".to_string();
    notification
        .set_aps(&IosAps::alert("You got a new red packet"))
        .expect("aps serializes");
    notification
        .insert("url", &"app://wallet")
        .expect("url serializes");
    notification
}
