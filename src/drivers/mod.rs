// Communication drivers module
//
// This module provides the transport used by the device layer. The register
// façade depends only on the `RegisterTransport` trait, so tests can swap in
// an in-memory register image.

/// Modbus TCP communication driver
/// Client implementation for Modbus protocol over TCP/IP for industrial devices
pub mod modbus;

pub use modbus::{ModbusClient, ModbusError, RegisterTransport};
