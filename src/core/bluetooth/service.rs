//! Bluetooth service
//! This module provides the main interface for bluetooth operations. Every
//! failure from the native stack is logged and turned into a status value;
//! nothing is propagated to callers.
//!
//! All operations take `&self`, so the service can be shared behind an `Arc`.
//! Only scan start/stop are serialized; a slow connect never blocks status
//! reads or stopping a scan.

use std::sync::Arc;

use anyhow::Result;
use log::{error, info, warn};
use tokio::sync::{broadcast, Mutex};

use crate::config::BluetoothConfig;
use crate::core::bluetooth::backend::{BleBackend, Peripheral};
use crate::core::bluetooth::constants::EVENT_CHANNEL_CAPACITY;
use crate::core::bluetooth::scanner::{BluetoothScanner, ScanSettings};
use crate::core::bluetooth::session::Session;
use crate::core::bluetooth::types::{
    AdapterState, BluetoothConnectionStatus, BluetoothDevice, BluetoothEvent, BluetoothScanStatus,
};

/// Discovers and connects to nearby BLE devices.
pub struct BluetoothService<B: BleBackend> {
    backend: Arc<B>,
    session: Session<B::Peripheral>,
    scanner: Mutex<BluetoothScanner<B>>,
    events: broadcast::Sender<BluetoothEvent>,
    default_rssi: i16,
}

impl<B: BleBackend> BluetoothService<B> {
    /// Creates a new BluetoothService over the given backend
    pub fn new(backend: B, config: &BluetoothConfig) -> Self {
        let backend = Arc::new(backend);
        let session = Session::default();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let scanner = BluetoothScanner::new(
            backend.clone(),
            session.clone(),
            events.clone(),
            ScanSettings {
                default_rssi: config.default_rssi,
                allow_duplicates: config.allow_duplicates,
            },
        );

        Self {
            backend,
            session,
            scanner: Mutex::new(scanner),
            events,
            default_rssi: config.default_rssi,
        }
    }

    /// Returns true when the adapter is powered on.
    pub async fn initialize(&self) -> bool {
        match self.backend.state().await {
            Ok(state) => {
                info!("Bluetooth adapter state: {:?}", state);
                state == AdapterState::PoweredOn
            }
            Err(e) => {
                error!("Error initializing Bluetooth: {}", e);
                false
            }
        }
    }

    /// Checks if Bluetooth is enabled
    pub async fn is_bluetooth_enabled(&self) -> bool {
        match self.backend.state().await {
            Ok(state) => state == AdapterState::PoweredOn,
            Err(e) => {
                error!("Error checking Bluetooth state: {}", e);
                false
            }
        }
    }

    /// Clears the discovered devices and starts a new scan.
    pub async fn start_scan(&self) {
        self.scanner.lock().await.start_scan().await
    }

    pub async fn stop_scan(&self) {
        self.scanner.lock().await.stop_scan().await
    }

    /// Connects to a device with the given ID
    pub async fn connect_to_device(&self, device_id: &str) -> bool {
        if self.session.lock().connected.contains_key(device_id) {
            info!("Device {} already connected.", device_id);
            self.set_connection_status(device_id, BluetoothConnectionStatus::Connected);
            return true;
        }

        self.set_connection_status(device_id, BluetoothConnectionStatus::Connecting);

        match self.open_connection(device_id).await {
            Ok(peripheral) => {
                {
                    let mut state = self.session.lock();
                    state.connected.insert(device_id.to_string(), peripheral);
                    state.discovered.set_connected(device_id, true);
                }
                self.set_connection_status(device_id, BluetoothConnectionStatus::Connected);
                info!("Device {} successfully connected.", device_id);
                true
            }
            Err(e) => {
                error!("Error connecting to device {}: {}", device_id, e);
                self.set_connection_status(device_id, BluetoothConnectionStatus::Error);
                false
            }
        }
    }

    async fn open_connection(&self, device_id: &str) -> Result<B::Peripheral> {
        info!("Initiating connection to {}...", device_id);
        let peripheral = self.backend.connect(device_id).await?;
        info!("Connection successful, discovering services...");
        peripheral.discover_services().await?;
        Ok(peripheral)
    }

    /// Disconnects from a device. Unknown ids succeed without touching the backend.
    pub async fn disconnect_from_device(&self, device_id: &str) -> bool {
        self.set_connection_status(device_id, BluetoothConnectionStatus::Disconnecting);

        let peripheral = self.session.lock().connected.get(device_id).cloned();
        match peripheral {
            Some(peripheral) => {
                if let Err(e) = peripheral.cancel_connection().await {
                    error!("Error disconnecting from device {}: {}", device_id, e);
                    self.set_connection_status(device_id, BluetoothConnectionStatus::Error);
                    return false;
                }
                let mut state = self.session.lock();
                state.connected.remove(device_id);
                state.discovered.set_connected(device_id, false);
                info!("Successfully disconnected from {}", device_id);
            }
            None => warn!("Device {} not connected", device_id),
        }

        self.set_connection_status(device_id, BluetoothConnectionStatus::Disconnected);
        true
    }

    /// Devices seen in the current scan session, in discovery order.
    pub fn discovered_devices(&self) -> Vec<BluetoothDevice> {
        self.session.lock().discovered.to_vec()
    }

    /// Devices the service holds a connection to.
    pub fn connected_devices(&self) -> Vec<BluetoothDevice> {
        self.session
            .lock()
            .connected
            .values()
            .map(|p| BluetoothDevice {
                id: p.id(),
                name: p.name(),
                rssi: p.rssi().unwrap_or(self.default_rssi),
                is_connectable: p.is_connectable().unwrap_or(false),
                is_connected: true,
            })
            .collect()
    }

    pub fn scan_status(&self) -> BluetoothScanStatus {
        self.session.scan_status()
    }

    pub fn connection_status(&self) -> BluetoothConnectionStatus {
        self.session.lock().connection_status
    }

    /// True while a scan task is alive.
    pub async fn is_scanning(&self) -> bool {
        self.scanner.lock().await.is_running()
    }

    /// Subscribes to scan and connection updates.
    pub fn subscribe(&self) -> broadcast::Receiver<BluetoothEvent> {
        self.events.subscribe()
    }

    /// Stops any running scan and releases the backend.
    pub async fn destroy(&self) {
        let mut scanner = self.scanner.lock().await;
        if scanner.is_running() {
            scanner.stop_scan().await;
        }
        drop(scanner);
        self.backend.destroy();
        info!("Bluetooth service destroyed.");
    }

    fn set_connection_status(&self, device_id: &str, status: BluetoothConnectionStatus) {
        self.session.lock().connection_status = status;
        let _ = self.events.send(BluetoothEvent::ConnectionChanged {
            device_id: device_id.to_string(),
            status,
        });
    }
}
