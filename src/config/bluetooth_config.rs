use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::bluetooth::DEFAULT_RSSI;

/// Bluetooth scan settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BluetoothConfig {
    /// Report every advertisement to subscribers instead of only the first
    /// one per device.
    pub allow_duplicates: bool,
    /// RSSI used when the platform does not report one.
    pub default_rssi: i16,
    /// Only scan for devices advertising one of these services. Empty means all devices.
    pub service_uuids: Vec<Uuid>,
}

impl Default for BluetoothConfig {
    fn default() -> Self {
        BluetoothConfig {
            allow_duplicates: false,
            default_rssi: DEFAULT_RSSI,
            service_uuids: Vec::new(),
        }
    }
}
