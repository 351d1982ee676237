//! Callback credentials configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Length of the platform-issued `EncodingAESKey` string
pub const ENCODING_AES_KEY_LEN: usize = 43;

/// Environment variable holding the callback token
pub const ENV_TOKEN: &str = "WECOM_TOKEN";
/// Environment variable holding the corp id
pub const ENV_CORP_ID: &str = "WECOM_CORP_ID";
/// Environment variable holding the 43-character encoding key
pub const ENV_ENCODING_AES_KEY: &str = "WECOM_ENCODING_AES_KEY";
/// Environment variable holding the default agent id
pub const ENV_AGENT_ID: &str = "WECOM_AGENT_ID";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is absent or empty
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),

    /// A setting is present but malformed
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Setting name
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// The configuration document could not be deserialized
    #[error("Configuration parse error: {0}")]
    Parse(String),
}

/// Credentials consumed by the protocol layer.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WecomConfig {
    /// Shared secret used only for signature computation
    pub token: String,
    /// Corp id, embedded in and validated against every encrypted payload
    pub corp_id: String,
    /// 43-character base64 key material (without trailing `=`)
    pub encoding_aes_key: String,
    /// Default agent used for active pushes
    #[serde(default)]
    pub agent_id: Option<i64>,
}

impl fmt::Debug for WecomConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WecomConfig")
            .field("token", &"REDACTED")
            .field("corp_id", &self.corp_id)
            .field("encoding_aes_key", &"REDACTED")
            .field("agent_id", &self.agent_id)
            .finish()
    }
}

impl WecomConfig {
    /// Create a configuration from explicit values
    #[must_use]
    pub fn new(
        token: impl Into<String>,
        corp_id: impl Into<String>,
        encoding_aes_key: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            corp_id: corp_id.into(),
            encoding_aes_key: encoding_aes_key.into(),
            agent_id: None,
        }
    }

    /// Set the default agent id
    #[must_use]
    pub fn with_agent_id(mut self, agent_id: i64) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    /// Load configuration from `WECOM_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is unset or any value fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let agent_id = match std::env::var(ENV_AGENT_ID) {
            Ok(value) => Some(value.trim().parse::<i64>().map_err(|e| {
                ConfigError::Invalid {
                    field: "agent_id",
                    reason: e.to_string(),
                }
            })?),
            Err(_) => None,
        };

        let config = Self {
            token: require_env(ENV_TOKEN, "token")?,
            corp_id: require_env(ENV_CORP_ID, "corp_id")?,
            encoding_aes_key: require_env(ENV_ENCODING_AES_KEY, "encoding_aes_key")?,
            agent_id,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or any value fails validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every required value is present and the key has the expected length
    ///
    /// # Errors
    ///
    /// Returns the first failing setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.is_empty() {
            return Err(ConfigError::Missing("token"));
        }
        if self.corp_id.is_empty() {
            return Err(ConfigError::Missing("corp_id"));
        }
        if self.encoding_aes_key.is_empty() {
            return Err(ConfigError::Missing("encoding_aes_key"));
        }
        if self.encoding_aes_key.len() != ENCODING_AES_KEY_LEN {
            return Err(ConfigError::Invalid {
                field: "encoding_aes_key",
                reason: format!(
                    "expected {ENCODING_AES_KEY_LEN} characters, got {}",
                    self.encoding_aes_key.len()
                ),
            });
        }
        Ok(())
    }
}

fn require_env(var: &str, field: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::Missing(field)),
    }
}
