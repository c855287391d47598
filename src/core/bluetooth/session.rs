//! State shared between the Bluetooth service and its scan task.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::bluetooth::registry::DeviceRegistry;
use crate::core::bluetooth::types::{BluetoothConnectionStatus, BluetoothScanStatus};

/// Connection state is tracked twice: once as native handles in `connected`
/// and once as the `is_connected` flag on discovered records. A device that
/// drops its link on its own stays marked connected in both until the next
/// explicit disconnect.
pub struct SessionState<P> {
    pub discovered: DeviceRegistry,
    pub connected: BTreeMap<String, P>,
    pub scan_status: BluetoothScanStatus,
    pub connection_status: BluetoothConnectionStatus,
}

impl<P> Default for SessionState<P> {
    fn default() -> Self {
        Self {
            discovered: DeviceRegistry::default(),
            connected: BTreeMap::new(),
            scan_status: BluetoothScanStatus::Idle,
            connection_status: BluetoothConnectionStatus::Disconnected,
        }
    }
}

/// Cloneable handle to the session state. The lock is never held across `.await`.
pub struct Session<P> {
    inner: Arc<Mutex<SessionState<P>>>,
}

impl<P> Clone for Session<P> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<P> Default for Session<P> {
    fn default() -> Self {
        Self { inner: Arc::new(Mutex::new(SessionState::default())) }
    }
}

impl<P> Session<P> {
    pub fn lock(&self) -> MutexGuard<'_, SessionState<P>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn scan_status(&self) -> BluetoothScanStatus {
        self.lock().scan_status
    }

    pub fn set_scan_status(&self, status: BluetoothScanStatus) {
        self.lock().scan_status = status;
    }
}
