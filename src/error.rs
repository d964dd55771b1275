// Device-level error taxonomy
// Every failure of the register façade is surfaced to the caller as one of these variants

use crate::drivers::modbus::ModbusError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Transport unreachable, refused, or the host name did not resolve
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Already connected to {0}")]
    AlreadyConnected(String),
    #[error("Not connected")]
    NotConnected,
    #[error("Unknown field '{0}'")]
    UnknownField(String),
    #[error("Field '{0}' is read-only")]
    NotWritable(String),
    #[error("Device did not respond before the timeout")]
    DeviceTimeout,
    #[error("Cannot decode '{field}': {reason}")]
    Decode { field: String, reason: String },
    #[error("Cannot encode '{field}': {reason}")]
    Encode { field: String, reason: String },
    /// The device answered with a Modbus exception response
    #[error("Device exception: {0}")]
    Exception(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl DeviceError {
    pub(crate) fn decode(field: &str, reason: impl Into<String>) -> Self {
        DeviceError::Decode {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn encode(field: &str, reason: impl Into<String>) -> Self {
        DeviceError::Encode {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<ModbusError> for DeviceError {
    fn from(error: ModbusError) -> Self {
        match error {
            ModbusError::ConnectionFailed(msg) => DeviceError::Connection(msg),
            ModbusError::AlreadyConnected(target) => DeviceError::AlreadyConnected(target),
            ModbusError::NotConnected => DeviceError::NotConnected,
            ModbusError::Timeout => DeviceError::DeviceTimeout,
            ModbusError::Exception(msg) => DeviceError::Exception(msg),
            ModbusError::ProtocolError(msg) => DeviceError::Protocol(msg),
        }
    }
}
