use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::bluetooth::backend::BleBackend;
use crate::core::bluetooth::session::Session;
use crate::core::bluetooth::types::{
    Advertisement, BluetoothDevice, BluetoothEvent, BluetoothScanStatus,
};

/// How scan results are turned into device records.
#[derive(Debug, Clone, Copy)]
pub struct ScanSettings {
    pub default_rssi: i16,
    /// Emit `DeviceFound` for every advertisement instead of once per device.
    pub allow_duplicates: bool,
}

/// Runs at most one background scan task against the backend.
pub struct BluetoothScanner<B: BleBackend> {
    backend: Arc<B>,
    session: Session<B::Peripheral>,
    events: broadcast::Sender<BluetoothEvent>,
    settings: ScanSettings,
    cancel_token: CancellationToken,
    scan_task_handle: Option<JoinHandle<()>>,
}

impl<B: BleBackend> BluetoothScanner<B> {
    pub fn new(
        backend: Arc<B>,
        session: Session<B::Peripheral>,
        events: broadcast::Sender<BluetoothEvent>,
        settings: ScanSettings,
    ) -> Self {
        Self {
            backend,
            session,
            events,
            settings,
            cancel_token: CancellationToken::new(),
            scan_task_handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.scan_task_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Starts a fresh scan session, replacing any running one.
    pub async fn start_scan(&mut self) {
        if self.scan_task_handle.is_some() {
            self.cancel_task().await;
        }

        {
            let mut state = self.session.lock();
            state.scan_status = BluetoothScanStatus::Scanning;
            state.discovered.clear();
        }

        self.cancel_token = CancellationToken::new();
        let handle = tokio::spawn(Self::internal_scan_task(
            self.backend.clone(),
            self.session.clone(),
            self.events.clone(),
            self.settings,
            self.cancel_token.clone(),
        ));
        self.scan_task_handle = Some(handle);

        let _ = self.events.send(BluetoothEvent::ScanStarted);
        info!("Device scan task started.");
    }

    /// Stops the running scan session, if any, and marks the scan stopped.
    pub async fn stop_scan(&mut self) {
        info!("Stopping Bluetooth scan.");
        self.cancel_task().await;
        self.session.set_scan_status(BluetoothScanStatus::Stopped);
        let _ = self.events.send(BluetoothEvent::ScanStopped);
    }

    async fn cancel_task(&mut self) {
        self.cancel_token.cancel();

        if let Some(handle) = self.scan_task_handle.take() {
            debug!("Waiting for scan task to finish...");
            match handle.await {
                Ok(()) => debug!("Scan task finished after cancellation."),
                Err(e) if e.is_cancelled() => info!("Scan task was cancelled."),
                Err(e) => error!("Error stopping scan: {:?}", e),
            }
        } else {
            debug!("No active scan task handle found to wait for.");
        }
    }

    async fn internal_scan_task(
        backend: Arc<B>,
        session: Session<B::Peripheral>,
        events: broadcast::Sender<BluetoothEvent>,
        settings: ScanSettings,
        cancel_token: CancellationToken,
    ) {
        let (sink, mut results) = mpsc::unbounded_channel::<Result<Advertisement>>();
        let scan = backend.scan(sink, cancel_token.clone());
        tokio::pin!(scan);
        let mut scan_returned = false;

        loop {
            tokio::select! {
                result = &mut scan, if !scan_returned => {
                    scan_returned = true;
                    if let Err(e) = result {
                        error!("Error starting scan: {}", e);
                        session.set_scan_status(BluetoothScanStatus::Error);
                        let _ = events.send(BluetoothEvent::ScanFailed(e.to_string()));
                    }
                }
                result = results.recv() => match result {
                    Some(Ok(advertisement)) => {
                        Self::record_advertisement(&session, &events, settings, &advertisement);
                    }
                    Some(Err(e)) => {
                        error!("Scan error: {}", e);
                        session.set_scan_status(BluetoothScanStatus::Error);
                        let _ = events.send(BluetoothEvent::ScanFailed(e.to_string()));
                    }
                    None => break,
                }
            }
        }

        if !cancel_token.is_cancelled() {
            let mut state = session.lock();
            if state.scan_status == BluetoothScanStatus::Scanning {
                info!("Bluetooth scan stream has ended.");
                state.scan_status = BluetoothScanStatus::Stopped;
                drop(state);
                let _ = events.send(BluetoothEvent::ScanStopped);
            }
        }
    }

    fn record_advertisement(
        session: &Session<B::Peripheral>,
        events: &broadcast::Sender<BluetoothEvent>,
        settings: ScanSettings,
        advertisement: &Advertisement,
    ) {
        debug!("Found device - {:?}", advertisement);
        let (device, is_new) = {
            let mut state = session.lock();
            let is_connected = state.connected.contains_key(&advertisement.id);
            let device = BluetoothDevice::from_advertisement(
                advertisement,
                settings.default_rssi,
                is_connected,
            );
            let is_new = state.discovered.upsert(device.clone());
            (device, is_new)
        };

        if is_new || settings.allow_duplicates {
            let _ = events.send(BluetoothEvent::DeviceFound(device));
        }
    }
}
