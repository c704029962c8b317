//! Notification models and their validation rules
//!
//! A push request is a base [`Notification`] (credentials, cast type, targeting)
//! flattened together with a platform payload. Both halves validate themselves;
//! [`PushNotification::validate`] runs them in order and stops at the first
//! violation.

pub mod android;
pub mod ios;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{PushError, PushResult};

pub use android::{AfterOpen, AndroidBody, AndroidNotification, AndroidPayload, AndroidPolicy, DisplayType};
pub use ios::{IosAps, IosNotification, IosPayload, IosPolicy};

/// How a notification is targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastType {
    /// A single device token
    Unicast,
    /// Up to 500 comma-separated device tokens
    Listcast,
    /// Device tokens from an uploaded file
    Filecast,
    /// Every device of the app
    Broadcast,
    /// Devices matching a filter expression
    Groupcast,
    /// Developer-defined aliases, given inline or via an uploaded file
    Customizedcast,
}

impl CastType {
    pub const ALL: [CastType; 6] = [
        CastType::Unicast,
        CastType::Listcast,
        CastType::Filecast,
        CastType::Broadcast,
        CastType::Groupcast,
        CastType::Customizedcast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CastType::Unicast => "unicast",
            CastType::Listcast => "listcast",
            CastType::Filecast => "filecast",
            CastType::Broadcast => "broadcast",
            CastType::Groupcast => "groupcast",
            CastType::Customizedcast => "customizedcast",
        }
    }
}

impl fmt::Display for CastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CastType {
    type Err = PushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CastType::ALL
            .into_iter()
            .find(|cast| cast.as_str() == s)
            .ok_or_else(|| PushError::UnsupportedCastType {
                cast_type: s.to_string(),
            })
    }
}

/// Fields shared by every platform's notification
///
/// String fields left empty are omitted from the wire body. The master secret
/// is only used for signing and never serialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notification {
    #[serde(skip)]
    pub app_master_secret: String,

    #[serde(rename = "appkey")]
    pub app_key: String,

    /// Milliseconds since the epoch; the service accepts it for 10 minutes
    pub timestamp: i64,

    /// One of the [`CastType`] names
    #[serde(rename = "type")]
    pub cast_type: String,

    /// Required for unicast (one token) and listcast (comma-separated)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device_tokens: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias_type: String,

    /// Comma-separated, at most 50 aliases
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_id: String,

    /// Groupcast filter expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,

    /// "true" for production, "false" for test devices
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub production_mode: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(rename = "thirdparty_id", default, skip_serializing_if = "String::is_empty")]
    pub third_party_id: String,
}

impl Notification {
    /// Create a base notification holding only the app credentials
    pub fn new(app_key: impl Into<String>, app_master_secret: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            app_master_secret: app_master_secret.into(),
            ..Default::default()
        }
    }

    pub fn set_app_config(&mut self, app_key: impl Into<String>, app_master_secret: impl Into<String>) {
        self.app_key = app_key.into();
        self.app_master_secret = app_master_secret.into();
    }

    pub fn set_cast_type(&mut self, cast_type: CastType) {
        self.cast_type = cast_type.to_string();
    }

    /// Stamp the current time and switch to `customizedcast`
    pub fn prepare_customizedcast(&mut self) {
        self.timestamp = Utc::now().timestamp_millis();
        self.set_cast_type(CastType::Customizedcast);
    }

    /// Check required fields and the cast-type specific targeting rules
    ///
    /// Only `customizedcast` has its targeting checked; the other cast types
    /// are accepted as long as the name is recognized.
    pub fn validate(&self) -> PushResult<()> {
        if self.app_key.is_empty() {
            return Err(PushError::missing("appkey", "the app key identifies the application"));
        }
        if self.app_master_secret.is_empty() {
            return Err(PushError::missing(
                "app_master_secret",
                "the master secret is needed to sign the request",
            ));
        }
        if self.timestamp == 0 {
            return Err(PushError::missing("timestamp", "set it to the current time in milliseconds"));
        }
        if self.cast_type.is_empty() {
            return Err(PushError::missing("type", "choose a cast type"));
        }

        match self.cast_type.parse::<CastType>()? {
            CastType::Customizedcast => {
                if self.alias_type.is_empty() || (self.alias.is_empty() && self.file_id.is_empty()) {
                    return Err(PushError::CustomizedcastTarget);
                }
            }
            CastType::Unicast
            | CastType::Listcast
            | CastType::Filecast
            | CastType::Broadcast
            | CastType::Groupcast => {}
        }

        Ok(())
    }
}

/// Platform payload carried alongside the base notification
pub trait Payload {
    /// Check the payload's own required fields
    fn validate(&self) -> PushResult<()>;
}

/// A complete, sendable notification for one platform
pub trait PushNotification: Serialize + Send + Sync {
    type Payload: Payload;

    /// Platform name used in log lines
    const PLATFORM: &'static str;

    fn base(&self) -> &Notification;

    fn base_mut(&mut self) -> &mut Notification;

    fn payload(&self) -> &Self::Payload;

    /// Validate the base fields, then the payload
    fn validate(&self) -> PushResult<()> {
        self.base().validate()?;
        self.payload().validate()
    }

    /// Serialize to the JSON wire body
    fn to_body(&self) -> PushResult<String> {
        serde_json::to_string(self).map_err(|e| PushError::JsonSerialization {
            context: format!("{} notification body", Self::PLATFORM),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customizedcast() -> Notification {
        let mut n = Notification::new("key", "secret");
        n.timestamp = 1_700_000_000_000;
        n.set_cast_type(CastType::Customizedcast);
        n.alias_type = "uid".to_string();
        n.alias = "42".to_string();
        n
    }

    #[test]
    fn test_cast_type_round_trip_names() {
        for cast in CastType::ALL {
            assert_eq!(cast.as_str().parse::<CastType>().unwrap(), cast);
        }
        assert!(matches!(
            "multicast".parse::<CastType>(),
            Err(PushError::UnsupportedCastType { .. })
        ));
    }

    #[test]
    fn test_required_fields() {
        assert!(customizedcast().validate().is_ok());

        let mut n = customizedcast();
        n.app_key.clear();
        assert!(matches!(n.validate(), Err(PushError::MissingField { field: "appkey", .. })));

        let mut n = customizedcast();
        n.app_master_secret.clear();
        assert!(matches!(
            n.validate(),
            Err(PushError::MissingField { field: "app_master_secret", .. })
        ));

        let mut n = customizedcast();
        n.timestamp = 0;
        assert!(matches!(n.validate(), Err(PushError::MissingField { field: "timestamp", .. })));

        let mut n = customizedcast();
        n.cast_type.clear();
        assert!(matches!(n.validate(), Err(PushError::MissingField { field: "type", .. })));
    }

    #[test]
    fn test_unknown_cast_type() {
        let mut n = customizedcast();
        n.cast_type = "multicast".to_string();
        let err = n.validate().unwrap_err();
        assert_eq!(err.to_string(), "Type multicast unsupported!");
    }

    #[test]
    fn test_customizedcast_requires_alias_type() {
        let mut n = customizedcast();
        n.alias_type.clear();
        n.file_id = "file-1".to_string();
        assert!(matches!(n.validate(), Err(PushError::CustomizedcastTarget)));
    }

    #[test]
    fn test_customizedcast_accepts_alias_or_file_id() {
        let mut n = customizedcast();
        n.alias.clear();
        assert!(matches!(n.validate(), Err(PushError::CustomizedcastTarget)));

        n.file_id = "file-1".to_string();
        assert!(n.validate().is_ok());
    }

    #[test]
    fn test_other_cast_types_skip_targeting_checks() {
        for cast in [
            CastType::Unicast,
            CastType::Listcast,
            CastType::Filecast,
            CastType::Broadcast,
            CastType::Groupcast,
        ] {
            let mut n = Notification::new("key", "secret");
            n.timestamp = 1;
            n.set_cast_type(cast);
            assert!(n.validate().is_ok(), "{cast} should pass");
        }
    }

    #[test]
    fn test_prepare_customizedcast() {
        let mut n = Notification::new("key", "secret");
        n.set_cast_type(CastType::Broadcast);
        n.prepare_customizedcast();

        assert_eq!(n.cast_type, "customizedcast");
        // milliseconds, not seconds
        assert!(n.timestamp > 1_000_000_000_000);
    }

    #[test]
    fn test_secret_is_not_serialized() {
        let n = customizedcast();
        let json = serde_json::to_value(&n).unwrap();

        assert_eq!(json["appkey"], "key");
        assert_eq!(json["type"], "customizedcast");
        assert!(json.get("app_master_secret").is_none());
        assert!(json.get("file_id").is_none());
        assert!(!json.to_string().contains("secret"));
    }
}
