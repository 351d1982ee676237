//! Structured logging infrastructure
//!
//! Provides env_logger-based logging with secure handling of user identifiers
//! and proper integration with the standard log crate.

use log::{debug, error, info};
use sha2::{Digest, Sha256};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging infrastructure using `env_logger`
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging system (should be called once at application startup)
    ///
    /// Configure logging levels via `RUST_LOG` environment variable:
    /// - `RUST_LOG=debug` - Enable all debug logs
    /// - `RUST_LOG=info` - Enable info and above (recommended for production)
    /// - `RUST_LOG=wecom_cipher=debug,wecom=info` - Module-specific levels
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            // A host application may already own the global logger.
            if env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .try_init()
                .is_ok()
            {
                info!("Structured logging initialized");
            }
        });
    }

    /// Initialize logging for test environments
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log an inbound message with the sender identifier hashed
    pub fn log_inbound_message(msg_type: &str, from_id: &str, payload_len: usize) {
        let sender = Self::secure_hash_id(from_id);
        debug!("Inbound message: {msg_type} (from: {sender}, payload_len: {payload_len})");
    }

    /// Log an outbound reply with the recipient identifier hashed
    pub fn log_outbound_reply(msg_type: &str, to_id: &str) {
        let recipient = Self::secure_hash_id(to_id);
        debug!("Outbound reply: {msg_type} (to: {recipient})");
    }

    /// Secure logging of cryptographic errors
    ///
    /// Logs error types without exposing sensitive data
    pub fn log_crypto_error(operation: &str, error: &dyn std::error::Error) {
        error!(
            "Cryptographic operation failed: {} (error_type: {})",
            operation,
            std::any::type_name_of_val(error)
        );
    }

    /// Hash an identifier for logging.
    ///
    /// Returns `#` followed by the first 12 hex characters of its SHA-256 digest.
    #[must_use]
    pub fn secure_hash_id(id: &str) -> String {
        let hash = Sha256::digest(id.as_bytes());
        let hex_hash = format!("{hash:x}");
        format!("#{}", &hex_hash[..12])
    }
}
