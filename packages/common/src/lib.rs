//! Common infrastructure shared by the wecom crates
//!
//! This crate provides:
//! - Structured logging with hashed user identifiers
//! - Configuration loading for the callback credentials

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;

pub use config::{ConfigError, WecomConfig, ENCODING_AES_KEY_LEN};
pub use logging::LoggingTransformer;
