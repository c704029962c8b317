use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Notification, Payload, PushNotification};
use crate::errors::{PushError, PushResult};

/// iOS payload: a free-form JSON object that must carry an `aps` entry
pub type IosPayload = Map<String, Value>;

/// iOS notification: base fields plus payload and optional policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IosNotification {
    #[serde(flatten)]
    pub base: Notification,

    pub payload: IosPayload,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<IosPolicy>,
}

/// Typed helper for the `aps` dictionary
///
/// Nothing checks its contents on send; only the presence of the `aps` key is
/// enforced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IosAps {
    pub alert: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub badge: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sound: String,

    #[serde(rename = "content-available", default, skip_serializing_if = "String::is_empty")]
    pub content_available: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IosPolicy {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub start_time: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub expire_time: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_send_num: Option<u32>,

    /// Honoured from iOS 10 on
    #[serde(rename = "apns-collapse-id", default, skip_serializing_if = "String::is_empty")]
    pub apns_collapse_id: String,
}

impl IosAps {
    pub fn alert(alert: impl Into<String>) -> Self {
        Self {
            alert: alert.into(),
            ..Default::default()
        }
    }
}

impl IosNotification {
    pub fn new(app_key: impl Into<String>, app_master_secret: impl Into<String>) -> Self {
        Self {
            base: Notification::new(app_key, app_master_secret),
            ..Default::default()
        }
    }

    /// Store `aps` under the payload's `aps` key
    pub fn set_aps(&mut self, aps: &IosAps) -> PushResult<()> {
        self.insert("aps", aps)
    }

    /// Insert any serializable value at the top level of the payload
    pub fn insert<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> PushResult<()> {
        let key = key.into();
        let value = serde_json::to_value(value).map_err(|e| PushError::JsonSerialization {
            context: format!("ios payload entry '{key}'"),
            source: Some(Box::new(e)),
        })?;
        self.payload.insert(key, value);
        Ok(())
    }
}

impl Payload for IosPayload {
    fn validate(&self) -> PushResult<()> {
        if !self.contains_key("aps") {
            return Err(PushError::MissingAps);
        }
        Ok(())
    }
}

impl PushNotification for IosNotification {
    type Payload = IosPayload;

    const PLATFORM: &'static str = "ios";

    fn base(&self) -> &Notification {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Notification {
        &mut self.base
    }

    fn payload(&self) -> &IosPayload {
        &self.payload
    }
}
