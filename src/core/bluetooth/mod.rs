//! Bluetooth functionality
//! This module handles device discovery and connection management. It does
//! not carry any message traffic.

mod backend;
#[cfg(feature = "ble")]
mod bluest_backend;
mod constants;
mod registry;
mod scanner;
mod service;
mod session;
mod types;

// Re-export types that should be publicly accessible
pub use backend::{BleBackend, Peripheral};
#[cfg(feature = "ble")]
pub use bluest_backend::{BluestBackend, BluestPeripheral};
pub use constants::*;
pub use registry::DeviceRegistry;
pub use scanner::{BluetoothScanner, ScanSettings};
pub use service::BluetoothService;
pub use types::{
    AdapterState, Advertisement, BluetoothConnectionStatus, BluetoothDevice, BluetoothEvent,
    BluetoothScanStatus,
};
