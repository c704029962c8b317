use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::{Notification, Payload, PushNotification};
use crate::errors::{PushError, PushResult};

/// What the device does with an Android payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayType {
    /// Shown in the notification tray
    Notification,
    /// Passed to the app silently, only `custom` is delivered
    Message,
}

impl DisplayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayType::Notification => "notification",
            DisplayType::Message => "message",
        }
    }
}

impl fmt::Display for DisplayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayType {
    type Err = PushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notification" => Ok(DisplayType::Notification),
            "message" => Ok(DisplayType::Message),
            other => Err(PushError::UnsupportedDisplayType {
                display_type: other.to_string(),
            }),
        }
    }
}

/// Action taken when the user taps a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterOpen {
    GoApp,
    GoUrl,
    GoActivity,
    GoCustom,
}

impl AfterOpen {
    pub fn as_str(&self) -> &'static str {
        match self {
            AfterOpen::GoApp => "go_app",
            AfterOpen::GoUrl => "go_url",
            AfterOpen::GoActivity => "go_activity",
            AfterOpen::GoCustom => "go_custom",
        }
    }
}

impl fmt::Display for AfterOpen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AfterOpen {
    type Err = PushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "go_app" => Ok(AfterOpen::GoApp),
            "go_url" => Ok(AfterOpen::GoUrl),
            "go_activity" => Ok(AfterOpen::GoActivity),
            "go_custom" => Ok(AfterOpen::GoCustom),
            other => Err(PushError::UnsupportedAfterOpen {
                after_open: other.to_string(),
            }),
        }
    }
}

/// Android notification: base fields plus payload and optional policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AndroidNotification {
    #[serde(flatten)]
    pub base: Notification,

    pub payload: AndroidPayload,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<AndroidPolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AndroidPayload {
    /// `notification` or `message`
    pub display_type: String,

    pub body: AndroidBody,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AndroidBody {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ticker: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,

    #[serde(rename = "largeIcon", default, skip_serializing_if = "String::is_empty")]
    pub large_icon: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub img: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sound: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder_id: Option<i32>,

    /// "true" or "false"; the service defaults to "true"
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub play_vibrate: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub play_lights: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub play_sound: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub after_open: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub activity: String,

    /// Free-form content, a string or any JSON value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AndroidPolicy {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub start_time: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub expire_time: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_send_num: Option<u32>,

    /// Deduplication key
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub out_biz_no: String,
}

impl AndroidNotification {
    pub fn new(app_key: impl Into<String>, app_master_secret: impl Into<String>) -> Self {
        Self {
            base: Notification::new(app_key, app_master_secret),
            ..Default::default()
        }
    }
}

impl AndroidPayload {
    pub fn set_display_type(&mut self, display_type: DisplayType) {
        self.display_type = display_type.to_string();
    }

    /// Attach a custom payload serialized from any value
    pub fn set_custom<T: Serialize>(&mut self, custom: &T) -> PushResult<()> {
        let value = serde_json::to_value(custom).map_err(|e| PushError::JsonSerialization {
            context: "android custom payload".to_string(),
            source: Some(Box::new(e)),
        })?;
        self.body.custom = Some(value);
        Ok(())
    }
}

impl Payload for AndroidPayload {
    fn validate(&self) -> PushResult<()> {
        let body = &self.body;

        match self.display_type.parse::<DisplayType>()? {
            DisplayType::Notification => {
                if body.ticker.is_empty()
                    || body.title.is_empty()
                    || body.text.is_empty()
                    || body.after_open.is_empty()
                {
                    return Err(PushError::missing(
                        "body",
                        "You need to set ticker and title and text and after_open for display_type notification!",
                    ));
                }

                match body.after_open.parse::<AfterOpen>()? {
                    AfterOpen::GoApp => {}
                    AfterOpen::GoUrl if body.url.is_empty() => {
                        return Err(PushError::missing("url", "You need to set url for after_open go_url!"));
                    }
                    AfterOpen::GoActivity if body.activity.is_empty() => {
                        return Err(PushError::missing(
                            "activity",
                            "You need to set activity for after_open go_activity!",
                        ));
                    }
                    AfterOpen::GoCustom if body.custom.is_none() => {
                        return Err(PushError::missing(
                            "custom",
                            "You need to set custom for after_open go_custom!",
                        ));
                    }
                    AfterOpen::GoUrl | AfterOpen::GoActivity | AfterOpen::GoCustom => {}
                }
            }
            DisplayType::Message => {
                if body.custom.is_none() {
                    return Err(PushError::missing(
                        "custom",
                        "You need to set custom for display_type message!",
                    ));
                }
            }
        }

        Ok(())
    }
}

impl PushNotification for AndroidNotification {
    type Payload = AndroidPayload;

    const PLATFORM: &'static str = "android";

    fn base(&self) -> &Notification {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Notification {
        &mut self.base
    }

    fn payload(&self) -> &AndroidPayload {
        &self.payload
    }
}
