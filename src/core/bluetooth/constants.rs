//! Constants used by the Bluetooth service.

/// RSSI reported for devices whose signal strength is unknown.
pub const DEFAULT_RSSI: i16 = -100;

/// Number of suffix characters of a device id shown for unnamed devices.
pub const UNNAMED_DEVICE_ID_CHARS: usize = 8;

/// Capacity of the Bluetooth event broadcast channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
