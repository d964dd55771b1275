// Connection configuration
// Where the device lives and how long to wait for it

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Modbus TCP connection settings for one ZE-SG3 module.
///
/// Keys missing from a JSON document take their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModbusConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Modbus unit identifier (slave id)
    pub unit_id: u8,
}

impl Default for ModbusConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 502,
            timeout_ms: 5_000,
            unit_id: 1,
        }
    }
}

impl ModbusConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reject settings no request could succeed with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms must be greater than 0".to_string()));
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&raw)?;
        log::debug!("Loaded config from {}: {:?}", path.as_ref().display(), config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_target_standard_modbus_port() {
        let config = ModbusConfig::default();
        assert_eq!(config.port, 502);
        assert_eq!(config.unit_id, 1);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ModbusConfig::from_json_str(r#"{ "host": "192.168.0.101", "timeout_ms": 250 }"#).unwrap();
        assert_eq!(config.host, "192.168.0.101");
        assert_eq!(config.port, 502);
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = ModbusConfig::from_json_str(r#"{ "port": "five" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ModbusConfig::from_json_str(r#"{ "timeout_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(ModbusConfig::from_json_str(r#"{ "host": "" }"#).is_err());
        assert!(ModbusConfig::default().validate().is_ok());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "host": "10.0.0.7", "port": 1502, "unit_id": 3 }}"#).unwrap();

        let config = ModbusConfig::from_file(file.path()).unwrap();
        assert_eq!(config, ModbusConfig {
            host: "10.0.0.7".to_string(),
            port: 1502,
            timeout_ms: 5_000,
            unit_id: 3,
        });
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ModbusConfig::from_file("/nonexistent/ze-sg3.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
