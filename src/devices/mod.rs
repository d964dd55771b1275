// Device abstractions built on the drivers layer

pub mod ze_sg3;

// Re-exports
pub use ze_sg3::ZeSg3Device;
