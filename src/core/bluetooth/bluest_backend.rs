//! Native BLE backend built on bluest.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{anyhow, Result};
use bluest::{Adapter, AdvertisingDevice, Device};
use futures_util::StreamExt;
use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::core::bluetooth::backend::{BleBackend, Peripheral};
use crate::core::bluetooth::types::{AdapterState, Advertisement};

/// Scan results keyed by device id, so connections can be opened by id.
type DeviceCache = Arc<Mutex<HashMap<String, SeenDevice>>>;

#[derive(Clone)]
struct SeenDevice {
    device: Device,
    name: Option<String>,
    rssi: Option<i16>,
    is_connectable: bool,
}

pub struct BluestBackend {
    adapter: Option<Adapter>,
    service_filter: Vec<Uuid>,
    devices: DeviceCache,
}

impl BluestBackend {
    /// Opens the default adapter. A missing adapter is not an error here:
    /// the backend then reports `Unsupported` and fails every operation.
    pub async fn new(service_filter: Vec<Uuid>) -> Self {
        let adapter = Adapter::default().await;
        if adapter.is_none() {
            warn!("No Bluetooth adapter found");
        }
        Self {
            adapter,
            service_filter,
            devices: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn adapter(&self) -> Result<&Adapter> {
        self.adapter
            .as_ref()
            .ok_or_else(|| anyhow!("No Bluetooth adapter found"))
    }

    fn remember(&self, discovered: &AdvertisingDevice) -> Advertisement {
        let device = discovered.device.clone();
        let id = device.id().to_string();
        let name = discovered
            .adv_data
            .local_name
            .clone()
            .or_else(|| device.name().ok());
        let seen = SeenDevice {
            device,
            name: name.clone(),
            rssi: discovered.rssi,
            is_connectable: discovered.adv_data.is_connectable,
        };
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), seen);

        Advertisement {
            id,
            name,
            rssi: discovered.rssi,
            is_connectable: Some(discovered.adv_data.is_connectable),
        }
    }
}

#[async_trait::async_trait]
impl BleBackend for BluestBackend {
    type Peripheral = BluestPeripheral;

    async fn state(&self) -> Result<AdapterState> {
        let Some(adapter) = self.adapter.as_ref() else {
            return Ok(AdapterState::Unsupported);
        };
        Ok(if adapter.is_available().await? {
            AdapterState::PoweredOn
        } else {
            AdapterState::PoweredOff
        })
    }

    async fn scan(
        &self,
        sink: UnboundedSender<Result<Advertisement>>,
        cancel: CancellationToken,
    ) -> Result<()> {
        let adapter = self.adapter()?;
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();

        info!("Starting bluetooth scan");
        let mut scan_stream = adapter.scan(&self.service_filter).await?;

        loop {
            tokio::select! {
                result = scan_stream.next() => match result {
                    Some(discovered) => {
                        let advertisement = self.remember(&discovered);
                        if sink.send(Ok(advertisement)).is_err() {
                            debug!("Scan result receiver dropped, ending scan.");
                            break;
                        }
                    }
                    None => {
                        info!("Bluetooth scan stream has ended.");
                        break;
                    }
                },
                _ = cancel.cancelled() => break,
            }
        }
        Ok(())
    }

    async fn connect(&self, device_id: &str) -> Result<BluestPeripheral> {
        let adapter = self.adapter()?;
        let seen = self
            .devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(device_id)
            .cloned()
            .ok_or_else(|| anyhow!("Device not found with ID: {}", device_id))?;

        if !seen.device.is_connected().await {
            adapter.connect_device(&seen.device).await?;
        }

        Ok(BluestPeripheral {
            adapter: adapter.clone(),
            device: seen.device,
            name: seen.name,
            rssi: seen.rssi,
            is_connectable: seen.is_connectable,
        })
    }

    fn destroy(&self) {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// A device connected through bluest.
#[derive(Clone)]
pub struct BluestPeripheral {
    adapter: Adapter,
    device: Device,
    name: Option<String>,
    rssi: Option<i16>,
    is_connectable: bool,
}

#[async_trait::async_trait]
impl Peripheral for BluestPeripheral {
    fn id(&self) -> String {
        self.device.id().to_string()
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn rssi(&self) -> Option<i16> {
        self.rssi
    }

    fn is_connectable(&self) -> Option<bool> {
        Some(self.is_connectable)
    }

    async fn discover_services(&self) -> Result<()> {
        let services = self.device.discover_services().await?;
        for service in &services {
            let characteristics = service.discover_characteristics().await?;
            debug!(
                "Service {} has {} characteristics",
                service.uuid(),
                characteristics.len()
            );
        }
        info!("Discovered {} services on {}", services.len(), self.device.id());
        Ok(())
    }

    async fn cancel_connection(&self) -> Result<()> {
        if self.device.is_connected().await {
            info!("Disconnecting from device {}", self.device.id());
            self.adapter.disconnect_device(&self.device).await?;
        } else {
            info!("Device {} not connected", self.device.id());
        }
        Ok(())
    }
}
