//! Session configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```
//! use api_calls::SessionConfig;
//!
//! let config = SessionConfig::from_json(r#"{ "uuid": "agent-1" }"#).unwrap();
//! assert_eq!(config.uuid.as_deref(), Some("agent-1"));
//! assert_eq!(config, SessionConfig { uuid: Some("agent-1".into()), ..Default::default() });
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::tlv::DEFAULT_MAX_PACKET_SIZE;

/// Default read buffer size (64 KB).
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum accepted packet body size in bytes.
    pub max_packet_size: u32,
    /// Size of the buffer used for each stream read.
    pub read_buffer_size: usize,
    /// Session uuid reported to the controller. Generated when absent.
    pub uuid: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            uuid: None,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_packet_size == 0 {
            return Err(ApiError::Config(
                "max_packet_size must be greater than 0".to_string(),
            ));
        }

        if self.read_buffer_size == 0 {
            return Err(ApiError::Config(
                "read_buffer_size must be greater than 0".to_string(),
            ));
        }

        if matches!(&self.uuid, Some(uuid) if uuid.is_empty()) {
            return Err(ApiError::Config("uuid must not be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.max_packet_size, 16 * 1024 * 1024);
        assert_eq!(config.read_buffer_size, 64 * 1024);
        assert!(config.uuid.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = SessionConfig::from_json("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config =
            SessionConfig::from_json(r#"{ "max_packet_size": 1024, "read_buffer_size": 512 }"#)
                .unwrap();
        assert_eq!(config.max_packet_size, 1024);
        assert_eq!(config.read_buffer_size, 512);
        assert!(config.uuid.is_none());
    }

    #[test]
    fn test_invalid_json() {
        let result = SessionConfig::from_json("{ not json");
        assert!(matches!(result, Err(ApiError::Json(_))));
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let result = SessionConfig::from_json(r#"{ "max_packet_size": 0 }"#);
        assert!(matches!(result, Err(ApiError::Config(_))));

        let result = SessionConfig::from_json(r#"{ "read_buffer_size": 0 }"#);
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_empty_uuid_rejected() {
        let result = SessionConfig::from_json(r#"{ "uuid": "" }"#);
        assert!(result.unwrap_err().to_string().contains("uuid"));
    }

    #[test]
    fn test_missing_file() {
        let result = SessionConfig::from_json_file("/nonexistent/api-calls.json");
        assert!(matches!(result, Err(ApiError::Io(_))));
    }

    #[test]
    fn test_serialize_roundtrip_through_json() {
        let config = SessionConfig {
            uuid: Some("abc".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SessionConfig::from_json(&json).unwrap(), config);
    }
}
