//! Centralized error handling module
//!
//! The library reports every failure as a typed [`PushError`]; the CLI layer
//! folds them into `anyhow::Error` with extra context.

pub mod types;

pub use types::{PushError, PushResult};
