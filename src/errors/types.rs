//! Error types for the umeng-push client
//!
//! Every failure a send can hit is one variant of [`PushError`], grouped by the
//! stage that raised it: local validation, serialization, transport, response
//! parsing, or an explicit rejection from the push service.

use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the push client
#[derive(Error, Debug)]
pub enum PushError {
    // Validation errors, raised before any network access
    #[error("Missing required field '{field}': {reason}")]
    MissingField {
        field: &'static str,
        reason: String,
    },

    #[error("Type {cast_type} unsupported!")]
    UnsupportedCastType {
        cast_type: String,
    },

    #[error("You need to set alias or upload file for customizedcast!")]
    CustomizedcastTarget,

    #[error("Display type {display_type} unsupported!")]
    UnsupportedDisplayType {
        display_type: String,
    },

    #[error("After open {after_open} unsupported!")]
    UnsupportedAfterOpen {
        after_open: String,
    },

    #[error("You need to set aps for payload!")]
    MissingAps,

    // Serialization errors
    #[error("JSON serialization error: {context}")]
    JsonSerialization {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("JSON deserialization error: {context}")]
    JsonDeserialization {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Network and HTTP errors
    #[error("HTTP request failed: {method} {url}")]
    HttpRequest {
        method: String,
        url: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Network timeout after {timeout_secs} seconds")]
    NetworkTimeout {
        timeout_secs: u64,
    },

    #[error("Invalid service URL: {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Remote rejection
    #[error("ret fail{}", rejection_suffix(.data))]
    Rejected {
        data: HashMap<String, String>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid configuration value for '{key}': {value}")]
    InvalidConfigValue {
        key: String,
        value: String,
    },

    #[error("TOML parsing error: {context}")]
    TomlParsing {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // I/O errors
    #[error("File I/O error for '{path}': {operation}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn rejection_suffix(data: &HashMap<String, String>) -> String {
    match data.get("error_code") {
        Some(code) => format!(" (error_code {code})"),
        None => String::new(),
    }
}

/// Convenience type alias for Results using PushError
pub type PushResult<T> = Result<T, PushError>;

impl PushError {
    /// Create a missing-field validation error
    pub fn missing(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MissingField {
            field,
            reason: reason.into(),
        }
    }

    /// Create a new Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new Config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new I/O error with source
    pub fn io_with_source(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a transport error for a request to `url`
    pub fn http_request(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::HttpRequest {
            method: "POST".to_string(),
            url: url.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether the error was raised before anything went over the network
    pub fn is_validation(&self) -> bool {
        self.category() == "validation"
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingField { .. }
            | Self::UnsupportedCastType { .. }
            | Self::CustomizedcastTarget
            | Self::UnsupportedDisplayType { .. }
            | Self::UnsupportedAfterOpen { .. }
            | Self::MissingAps => "validation",
            Self::JsonSerialization { .. } => "serialization",
            Self::JsonDeserialization { .. } => "deserialization",
            Self::HttpRequest { .. } | Self::NetworkTimeout { .. } | Self::InvalidUrl { .. } => {
                "network"
            }
            Self::Rejected { .. } => "rejected",
            Self::Config { .. } | Self::InvalidConfigValue { .. } | Self::TomlParsing { .. } => {
                "config"
            }
            Self::Io { .. } => "io",
        }
    }
}

impl From<std::io::Error> for PushError {
    fn from(err: std::io::Error) -> Self {
        let operation = match err.kind() {
            std::io::ErrorKind::NotFound => "file not found",
            std::io::ErrorKind::PermissionDenied => "permission denied",
            _ => "I/O operation",
        }
        .to_string();

        Self::Io {
            path: PathBuf::from("unknown"),
            operation,
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for PushError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() {
            Self::JsonDeserialization {
                context: format!(
                    "JSON syntax error at line {} column {}",
                    err.line(),
                    err.column()
                ),
                source: Some(Box::new(err)),
            }
        } else if err.is_data() {
            Self::JsonDeserialization {
                context: "JSON data error".to_string(),
                source: Some(Box::new(err)),
            }
        } else if err.is_eof() {
            Self::JsonDeserialization {
                context: "Unexpected end of JSON input".to_string(),
                source: Some(Box::new(err)),
            }
        } else {
            Self::JsonSerialization {
                context: "JSON serialization error".to_string(),
                source: Some(Box::new(err)),
            }
        }
    }
}

impl From<toml::de::Error> for PushError {
    fn from(err: toml::de::Error) -> Self {
        Self::TomlParsing {
            context: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<url::ParseError> for PushError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: "unparseable".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let err = PushError::UnsupportedDisplayType {
            display_type: "banner".to_string(),
        };
        assert_eq!(err.to_string(), "Display type banner unsupported!");

        let err = PushError::UnsupportedAfterOpen {
            after_open: "go_home".to_string(),
        };
        assert_eq!(err.to_string(), "After open go_home unsupported!");
    }

    #[test]
    fn test_error_category() {
        assert_eq!(PushError::MissingAps.category(), "validation");
        assert!(PushError::CustomizedcastTarget.is_validation());

        let timeout = PushError::NetworkTimeout { timeout_secs: 30 };
        assert_eq!(timeout.category(), "network");
        assert!(!timeout.is_validation());

        let rejected = PushError::Rejected {
            data: HashMap::new(),
        };
        assert_eq!(rejected.category(), "rejected");
    }

    #[test]
    fn test_rejected_message_includes_error_code() {
        let mut data = HashMap::new();
        data.insert("error_code".to_string(), "2018".to_string());
        let err = PushError::Rejected { data };
        assert_eq!(err.to_string(), "ret fail (error_code 2018)");

        let bare = PushError::Rejected {
            data: HashMap::new(),
        };
        assert_eq!(bare.to_string(), "ret fail");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: PushError = json_err.into();
        assert_eq!(err.category(), "deserialization");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PushError = io_err.into();

        match err {
            PushError::Io { operation, .. } => {
                assert_eq!(operation, "file not found");
            }
            _ => panic!("Wrong error type"),
        }
    }
}
