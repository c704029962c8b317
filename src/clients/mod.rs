//! Push service clients
//!
//! ## Architecture
//!
//! - **AsyncUmengClient**: async implementation of the send pipeline
//!   (validate, serialize, sign, post, interpret the envelope)
//! - **UmengClient**: sync wrapper around AsyncUmengClient for blocking callers
//! - **ResponseEnvelope**: the `{ret, data}` body every endpoint answers with
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use umeng_push::clients::{AsyncUmengClient, UmengClientConfig};
//! use umeng_push::notification::{AndroidNotification, DisplayType};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let client = AsyncUmengClient::new(UmengClientConfig::default())?;
//!
//! let mut notification = AndroidNotification::new("app-key", "app-master-secret");
//! notification.base.alias_type = "user_id".to_string();
//! notification.base.alias = "30000504".to_string();
//! notification.payload.set_display_type(DisplayType::Message);
//! notification.payload.set_custom(&serde_json::json!({"ptype": "reward_msg"}))?;
//!
//! client.send_customizedcast(&mut notification).await?;
//! # Ok(())
//! # }
//! ```

pub mod response;
pub mod umeng;

pub use response::{ResponseEnvelope, RET_FAIL, RET_SUCCESS};
pub use umeng::{AsyncUmengClient, SignedRequest, UmengClient, UmengClientConfig};

use crate::config::UmengConfig;
use crate::errors::PushResult;

/// Create an async client from the `[umeng]` configuration section
pub fn create_async_client_from_umeng_config(config: &UmengConfig) -> PushResult<AsyncUmengClient> {
    AsyncUmengClient::new(UmengClientConfig::from(config))
}

/// Create a blocking client from the `[umeng]` configuration section
pub fn create_sync_client_from_umeng_config(config: &UmengConfig) -> PushResult<UmengClient> {
    Ok(create_async_client_from_umeng_config(config)?.blocking())
}

impl From<&UmengConfig> for UmengClientConfig {
    fn from(config: &UmengConfig) -> Self {
        Self {
            host: config.host.clone(),
            upload_path: config.upload_path.clone(),
            send_path: config.send_path.clone(),
            timeout_secs: config.timeout_secs,
            ..Default::default()
        }
    }
}
