//! Defines shared data structures for the Bluetooth module.

use serde::{Deserialize, Serialize};

/// Represents a discovered Bluetooth device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BluetoothDevice {
    /// Platform-specific unique identifier for the device
    pub id: String,
    /// The advertised name of the device, if any
    pub name: Option<String>,
    /// The signal strength (RSSI) of the device
    pub rssi: i16,
    /// Whether the device advertised itself as connectable
    pub is_connectable: bool,
    /// Whether the service holds a connection to the device
    pub is_connected: bool,
}

impl BluetoothDevice {
    /// Builds a device record from a scan advertisement, filling in defaults
    /// for values the platform did not report.
    pub fn from_advertisement(adv: &Advertisement, default_rssi: i16, is_connected: bool) -> Self {
        Self {
            id: adv.id.clone(),
            name: adv.name.clone(),
            rssi: adv.rssi.unwrap_or(default_rssi),
            is_connectable: adv.is_connectable.unwrap_or(false),
            is_connected,
        }
    }
}

/// A single scan result as reported by the native BLE stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Advertisement {
    pub id: String,
    pub name: Option<String>,
    pub rssi: Option<i16>,
    pub is_connectable: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BluetoothScanStatus {
    #[default]
    Idle,
    Scanning,
    Stopped,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BluetoothConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
    Error,
}

/// Power state of the local adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdapterState {
    PoweredOn,
    PoweredOff,
    Unsupported,
    Unknown,
}

/// Updates pushed to subscribers of the Bluetooth service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum BluetoothEvent {
    ScanStarted,
    DeviceFound(BluetoothDevice),
    ScanStopped,
    ScanFailed(String),
    #[serde(rename_all = "camelCase")]
    ConnectionChanged {
        device_id: String,
        status: BluetoothConnectionStatus,
    },
}
