//! Core functionality for GazaLink
//! Message model and storage, and the Bluetooth discovery/connection service.

pub mod bluetooth;
pub mod message;
pub mod sample_data;
pub mod storage;

// Re-export commonly used types
pub use bluetooth::BluetoothService;
pub use message::{DeliveryStatus, Message, Priority};
pub use storage::{FileStore, KeyValueStore, MemoryStore, MessageStorage};
