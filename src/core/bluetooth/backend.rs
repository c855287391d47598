//! Seam between the Bluetooth service and the native BLE stack.

use anyhow::Result;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::core::bluetooth::types::{AdapterState, Advertisement};

/// Native BLE manager the service delegates to.
#[async_trait::async_trait]
pub trait BleBackend: Send + Sync + 'static {
    /// Handle to a connected peripheral.
    type Peripheral: Peripheral;

    /// Current power state of the adapter.
    async fn state(&self) -> Result<AdapterState>;

    /// Scans until `cancel` fires or the platform stream ends, pushing every
    /// advertisement (or scan error) into `sink`. Returns an error only when
    /// the scan cannot be started.
    async fn scan(
        &self,
        sink: UnboundedSender<Result<Advertisement>>,
        cancel: CancellationToken,
    ) -> Result<()>;

    /// Opens a connection to the device with the given id.
    async fn connect(&self, device_id: &str) -> Result<Self::Peripheral>;

    /// Releases native resources. The backend is unusable afterwards.
    fn destroy(&self) {}
}

/// A connected peripheral.
#[async_trait::async_trait]
pub trait Peripheral: Clone + Send + Sync + 'static {
    fn id(&self) -> String;
    fn name(&self) -> Option<String>;
    fn rssi(&self) -> Option<i16>;
    fn is_connectable(&self) -> Option<bool>;

    /// Discovers every service and characteristic of the peripheral.
    async fn discover_services(&self) -> Result<()>;

    /// Tears down the connection.
    async fn cancel_connection(&self) -> Result<()>;
}
