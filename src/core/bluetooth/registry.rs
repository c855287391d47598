use std::collections::HashMap;

use crate::core::bluetooth::types::BluetoothDevice;

/// Devices discovered during the current scan session, kept in discovery order.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    order: Vec<String>,
    devices: HashMap<String, BluetoothDevice>,
}

impl DeviceRegistry {
    /// Inserts or refreshes a device. Returns true on the first sighting.
    pub fn upsert(&mut self, device: BluetoothDevice) -> bool {
        let is_new = !self.devices.contains_key(&device.id);
        if is_new {
            self.order.push(device.id.clone());
        }
        self.devices.insert(device.id.clone(), device);
        is_new
    }

    pub fn set_connected(&mut self, device_id: &str, connected: bool) {
        if let Some(device) = self.devices.get_mut(device_id) {
            device.is_connected = connected;
        }
    }

    pub fn get(&self, device_id: &str) -> Option<&BluetoothDevice> {
        self.devices.get(device_id)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.devices.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Snapshot of all devices in discovery order.
    pub fn to_vec(&self) -> Vec<BluetoothDevice> {
        self.order
            .iter()
            .filter_map(|id| self.devices.get(id).cloned())
            .collect()
    }
}
