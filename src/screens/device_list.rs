use serde::Serialize;

use crate::core::bluetooth::{BluetoothConnectionStatus, BluetoothDevice, UNNAMED_DEVICE_ID_CHARS};
use crate::utils::tail_chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceAction {
    Connect,
    Disconnect,
}

impl DeviceAction {
    pub fn label(self) -> &'static str {
        match self {
            DeviceAction::Connect => "Connect",
            DeviceAction::Disconnect => "Disconnect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRow {
    pub id: String,
    pub display_name: String,
    pub rssi_label: String,
    pub is_connected: bool,
    pub status_label: &'static str,
    pub action: DeviceAction,
    pub action_enabled: bool,
    /// Show a spinner in place of the action label.
    pub show_spinner: bool,
}

impl DeviceRow {
    pub fn new(device: &BluetoothDevice, status: BluetoothConnectionStatus, is_loading: bool) -> Self {
        let is_connecting = status == BluetoothConnectionStatus::Connecting;
        let (action, action_enabled) = if device.is_connected {
            // Disconnect stays usable on connected rows; only a running scan blocks it.
            (DeviceAction::Disconnect, !is_loading)
        } else {
            (DeviceAction::Connect, !is_connecting && !is_loading)
        };

        Self {
            id: device.id.clone(),
            display_name: display_name(device),
            rssi_label: format!("RSSI: {} dBm", device.rssi),
            is_connected: device.is_connected,
            status_label: if device.is_connected { "Connected" } else { "Available" },
            action,
            action_enabled,
            show_spinner: is_connecting,
        }
    }
}

/// The advertised name, or a placeholder built from the end of the id.
pub fn display_name(device: &BluetoothDevice) -> String {
    match device.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!(
            "Unknown Device ({})",
            tail_chars(&device.id, UNNAMED_DEVICE_ID_CHARS)
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DeviceListView {
    Loading { text: &'static str },
    Empty { text: &'static str, subtext: &'static str },
    Devices { rows: Vec<DeviceRow> },
}

impl DeviceListView {
    pub fn new(
        devices: &[BluetoothDevice],
        status: BluetoothConnectionStatus,
        is_loading: bool,
    ) -> Self {
        if is_loading {
            return DeviceListView::Loading { text: "Scanning for devices..." };
        }
        if devices.is_empty() {
            return DeviceListView::Empty {
                text: "No devices found",
                subtext: "Make sure Bluetooth is enabled and devices are nearby",
            };
        }
        DeviceListView::Devices {
            rows: devices
                .iter()
                .map(|d| DeviceRow::new(d, status, is_loading))
                .collect(),
        }
    }
}
