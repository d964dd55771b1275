//! Named register access for the Seneca ZE-SG3 load-cell converter over Modbus TCP.
//!
//! ```no_run
//! use ze_sg3::{types::MeasureUnit, ZeSg3Device};
//!
//! let mut device = ZeSg3Device::connect("192.168.0.101", 502)?;
//! println!("firmware {}", device.firmware_version()?);
//! device.set_measure_unit(MeasureUnit::Kilogram)?;
//! println!("net weight {}", device.net_weight()?);
//! device.disconnect();
//! # Ok::<(), ze_sg3::DeviceError>(())
//! ```

pub mod config;
pub mod devices;
pub mod drivers;
pub mod error;
pub mod registers;
pub mod types;

pub use config::ModbusConfig;
pub use devices::ZeSg3Device;
pub use error::DeviceError;
pub use registers::{RegisterDescriptor, REGISTER_MAP};
pub use types::Value;
