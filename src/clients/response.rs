use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::errors::{PushError, PushResult};

pub const RET_SUCCESS: &str = "SUCCESS";
pub const RET_FAIL: &str = "FAIL";

/// Response body returned by the push service
///
/// `data` carries `msg_id`/`task_id`/`file_id` on success and `error_code`
/// plus `error_msg` on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Anything other than `FAIL` counts as success; missing or null reads as ""
    #[serde(default, deserialize_with = "nullable_string")]
    pub ret: String,

    #[serde(default, deserialize_with = "string_map")]
    pub data: HashMap<String, String>,
}

impl ResponseEnvelope {
    /// Parse a raw response body
    pub fn parse(body: &str) -> PushResult<Self> {
        serde_json::from_str(body).map_err(|e| PushError::JsonDeserialization {
            context: format!("response body is not a valid envelope: {body}"),
            source: Some(Box::new(e)),
        })
    }

    pub fn is_failure(&self) -> bool {
        self.ret == RET_FAIL
    }

    /// Turn a `FAIL` envelope into [`PushError::Rejected`], otherwise hand back `data`
    pub fn into_result(self) -> PushResult<HashMap<String, String>> {
        if self.is_failure() {
            return Err(PushError::Rejected { data: self.data });
        }
        Ok(self.data)
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept scalar values of any JSON type and keep them as strings
fn string_map<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => (key, s),
            other => (key, other.to_string()),
        })
        .collect())
}
