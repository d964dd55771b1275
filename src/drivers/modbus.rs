// Modbus TCP client
// Holding register reads and writes against a ZE-SG3 module

use crate::config::ModbusConfig;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;
use thiserror::Error;
use tokio_modbus::client::sync::{self, Context, Reader, Writer};
use tokio_modbus::{ExceptionCode, Slave};

/// Modbus communication errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModbusError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Already connected to {0}")]
    AlreadyConnected(String),
    #[error("Not connected")]
    NotConnected,
    #[error("Operation timed out")]
    Timeout,
    #[error("Exception response: {0}")]
    Exception(String),
    #[error("Protocol error: {0}")]
    ProtocolError(String),
}

/// Register transport
///
/// The device layer only relies on these primitives. Framing, transaction ids and timeouts belong to the implementation.
pub trait RegisterTransport {
    /// Open the session, `AlreadyConnected` if one is open
    fn connect(&mut self) -> Result<(), ModbusError>;

    /// Close the session, no-op when closed
    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;

    /// Read holding registers (function code 0x03)
    fn read_holding_registers(&mut self, address: u16, count: u16) -> Result<Vec<u16>, ModbusError>;

    /// Write a single holding register (function code 0x06)
    fn write_single_register(&mut self, address: u16, value: u16) -> Result<(), ModbusError>;

    /// Write consecutive holding registers (function code 0x10)
    fn write_multiple_registers(&mut self, address: u16, values: &[u16]) -> Result<(), ModbusError>;
}

/// Modbus TCP client
/// Wraps the tokio-modbus sync client; every request is bounded by the timeout
pub struct ModbusClient {
    /// Target host
    host: String,
    /// Target port
    port: u16,
    /// Connect and per-request timeout
    timeout: Duration,
    /// Modbus unit identifier (usually 1)
    unit_id: u8,
    /// Open session, `None` until `connect`
    client: Option<Context>,
}

impl ModbusClient {
    /// Create a client that is not connected yet
    ///
    /// Default timeout 5 s, unit id 1
    pub fn new(host: &str, port: u16) -> Self {
        Self::from_config(&ModbusConfig::new(host, port))
    }

    /// Create a client with explicit settings
    ///
    /// # Arguments
    /// * `host` - Modbus server host
    /// * `port` - Modbus server port
    /// * `timeout` - connect and request timeout
    /// * `unit_id` - Modbus unit identifier
    pub fn with_config(host: &str, port: u16, timeout: Duration, unit_id: u8) -> Self {
        Self {
            host: host.to_string(),
            port,
            timeout,
            unit_id,
            client: None,
        }
    }

    pub fn from_config(config: &ModbusConfig) -> Self {
        Self::with_config(&config.host, config.port, config.timeout(), config.unit_id)
    }

    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn resolve(&self) -> Result<Vec<SocketAddr>, ModbusError> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| ModbusError::ConnectionFailed(format!("Invalid address {}: {}", self.target(), e)))?
            .collect();
        if addrs.is_empty() {
            return Err(ModbusError::ConnectionFailed(format!(
                "{} did not resolve to any address",
                self.target()
            )));
        }
        Ok(addrs)
    }

    fn context(&mut self) -> Result<&mut Context, ModbusError> {
        self.client.as_mut().ok_or(ModbusError::NotConnected)
    }
}

/// Flatten the nested tokio-modbus result into a ModbusError
fn map_response<T>(response: Result<Result<T, ExceptionCode>, tokio_modbus::Error>) -> Result<T, ModbusError> {
    match response {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(exception)) => Err(ModbusError::Exception(exception.to_string())),
        Err(tokio_modbus::Error::Transport(e)) if e.kind() == io::ErrorKind::TimedOut => Err(ModbusError::Timeout),
        Err(e) => Err(ModbusError::ProtocolError(e.to_string())),
    }
}

impl RegisterTransport for ModbusClient {
    /// Connect to the server, trying each resolved address in turn
    fn connect(&mut self) -> Result<(), ModbusError> {
        if self.client.is_some() {
            return Err(ModbusError::AlreadyConnected(self.target()));
        }

        let mut last_error = None;
        for socket_addr in self.resolve()? {
            match sync::tcp::connect_slave_with_timeout(socket_addr, Slave(self.unit_id), Some(self.timeout)) {
                Ok(client) => {
                    log::info!("Connected to {} (unit {})", socket_addr, self.unit_id);
                    self.client = Some(client);
                    return Ok(());
                }
                Err(e) => {
                    log::warn!("Connection to {} failed: {}", socket_addr, e);
                    last_error = Some(e);
                }
            }
        }

        let reason = last_error.map(|e| e.to_string()).unwrap_or_default();
        Err(ModbusError::ConnectionFailed(format!("{}: {}", self.target(), reason)))
    }

    /// Disconnect from the server
    fn disconnect(&mut self) {
        if self.client.take().is_some() {
            log::info!("Disconnected from {}", self.target());
        }
    }

    /// Whether a session is open
    fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    fn read_holding_registers(&mut self, address: u16, count: u16) -> Result<Vec<u16>, ModbusError> {
        let client = self.context()?;
        map_response(client.read_holding_registers(address, count))
    }

    fn write_single_register(&mut self, address: u16, value: u16) -> Result<(), ModbusError> {
        let client = self.context()?;
        map_response(client.write_single_register(address, value))
    }

    fn write_multiple_registers(&mut self, address: u16, values: &[u16]) -> Result<(), ModbusError> {
        let client = self.context()?;
        map_response(client.write_multiple_registers(address, values))
    }
}

impl Drop for ModbusClient {
    /// Close the session when the client is dropped
    fn drop(&mut self) {
        self.disconnect();
    }
}
