//! Umeng Push Client Library
//!
//! Builds Android and iOS notifications for the Umeng push API, validates the
//! fields each platform and cast type requires, signs the request and posts it.

pub mod clients;
pub mod config;
pub mod errors;
pub mod notification;
pub mod signer;

// Re-export commonly used types for convenience
pub use clients::{AsyncUmengClient, ResponseEnvelope, SignedRequest, UmengClient, UmengClientConfig};
pub use config::{Config, ConfigManager, UmengConfig};
pub use errors::{PushError, PushResult};
pub use notification::{AndroidNotification, CastType, IosNotification, Notification, PushNotification};
