//! Application state management
//! This module defines and manages the global application state.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use anyhow::Result;
use log::info;
use tauri::{AppHandle, Manager};
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::core::bluetooth::{BluestBackend, BluetoothEvent, BluetoothService};
use crate::core::storage::{FileStore, MessageStorage};

/// Global application state
pub struct AppState {
    pub config: AppConfig,
    /// Message queue persisted in the app data directory
    pub storage: Arc<MessageStorage<FileStore>>,
    /// The Bluetooth service instance. Shared without an outer lock so a
    /// pending connect does not block status queries.
    pub bluetooth: Arc<BluetoothService<BluestBackend>>,
    bluetooth_events: StdMutex<Option<broadcast::Receiver<BluetoothEvent>>>,
}

impl AppState {
    /// Creates a new AppState instance
    pub async fn new(app_handle: &AppHandle, config: AppConfig) -> Result<Self> {
        let data_dir = app_handle.path().app_data_dir()?;
        info!("Using message store at {:?}", data_dir);
        let storage = MessageStorage::with_key(
            FileStore::new(data_dir),
            config.storage.messages_key.clone(),
        );

        info!("Initializing BluetoothService...");
        let backend = BluestBackend::new(config.bluetooth.service_uuids.clone()).await;
        let service = BluetoothService::new(backend, &config.bluetooth);
        let events = service.subscribe();

        Ok(Self {
            config,
            storage: Arc::new(storage),
            bluetooth: Arc::new(service),
            bluetooth_events: StdMutex::new(Some(events)),
        })
    }

    /// Hands out the Bluetooth event receiver created at startup. Only the
    /// first caller gets it.
    pub fn take_bluetooth_events(&self) -> Option<broadcast::Receiver<BluetoothEvent>> {
        self.bluetooth_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
