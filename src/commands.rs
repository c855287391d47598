//! Tauri commands
//! This module defines all the commands that can be invoked from the frontend.

use log::{debug, error, warn};
use tauri::{AppHandle, Emitter, State};
use tokio::sync::broadcast;

use crate::core::bluetooth::{
    BluetoothConnectionStatus, BluetoothDevice, BluetoothEvent, BluetoothScanStatus,
};
use crate::core::message::{Message, Priority};
use crate::core::sample_data;
use crate::screens::{DashboardView, DeviceListView, MessageForm, MessageQueueView};
use crate::state::AppState;

/// Event name Bluetooth updates are emitted under.
pub const BLUETOOTH_EVENT: &str = "bluetooth-event";

/// Re-emits every Bluetooth service event to the frontend.
pub fn forward_bluetooth_events(app_handle: AppHandle, mut events: broadcast::Receiver<BluetoothEvent>) {
    tauri::async_runtime::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    debug!("Forwarding bluetooth event: {:?}", event);
                    if let Err(e) = app_handle.emit(BLUETOOTH_EVENT, &event) {
                        error!("Failed to emit bluetooth event: {}", e);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Dropped {} bluetooth events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

#[tauri::command]
pub async fn get_messages(app_state: State<'_, AppState>) -> Result<Vec<Message>, String> {
    Ok(app_state.storage.get_messages().await)
}

/// Messages in queue order: urgent first, then oldest first.
#[tauri::command]
pub async fn get_sorted_messages(app_state: State<'_, AppState>) -> Result<Vec<Message>, String> {
    Ok(app_state.storage.get_sorted_messages().await)
}

#[tauri::command]
pub async fn save_message(message: Message, app_state: State<'_, AppState>) -> Result<(), String> {
    app_state.storage.save_message(&message).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn update_message(message: Message, app_state: State<'_, AppState>) -> Result<(), String> {
    app_state.storage.update_message(&message).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_message(message_id: String, app_state: State<'_, AppState>) -> Result<(), String> {
    app_state.storage.delete_message(&message_id).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn clear_all_messages(app_state: State<'_, AppState>) -> Result<(), String> {
    app_state.storage.clear_all_messages().await.map_err(|e| e.to_string())
}

/// Validates and saves a message from the create screen.
///
/// # Returns
/// The stored message, or the text of the error alert to show.
#[tauri::command]
pub async fn create_message(
    content: String,
    priority: Priority,
    app_state: State<'_, AppState>,
) -> Result<Message, String> {
    let mut form = MessageForm::new(content, priority);
    form.submit(&*app_state.storage).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_queue_view(app_state: State<'_, AppState>) -> Result<MessageQueueView, String> {
    Ok(MessageQueueView::load(&*app_state.storage).await)
}

#[tauri::command]
pub async fn get_dashboard(app_state: State<'_, AppState>) -> Result<DashboardView, String> {
    Ok(DashboardView::load(&*app_state.storage, &*app_state.bluetooth).await)
}

#[tauri::command]
pub async fn add_sample_data(app_state: State<'_, AppState>) -> Result<(), String> {
    sample_data::add_sample_data(&*app_state.storage).await;
    Ok(())
}

#[tauri::command]
pub async fn clear_all_data(app_state: State<'_, AppState>) -> Result<(), String> {
    sample_data::clear_all_data(&*app_state.storage).await;
    Ok(())
}

#[tauri::command]
pub async fn initialize_bluetooth(app_state: State<'_, AppState>) -> Result<bool, String> {
    Ok(app_state.bluetooth.initialize().await)
}

#[tauri::command]
pub async fn is_bluetooth_enabled(app_state: State<'_, AppState>) -> Result<bool, String> {
    Ok(app_state.bluetooth.is_bluetooth_enabled().await)
}

/// Starts scanning for Bluetooth devices.
///
/// Progress is reported through "bluetooth-event" events:
/// - `scanStarted` when scanning is started
/// - `deviceFound` with device details when a device is discovered
/// - `scanFailed` / `scanStopped` when scanning ends
#[tauri::command]
pub async fn start_scan(app_state: State<'_, AppState>) -> Result<(), String> {
    app_state.bluetooth.start_scan().await;
    Ok(())
}

#[tauri::command]
pub async fn stop_scan(app_state: State<'_, AppState>) -> Result<(), String> {
    app_state.bluetooth.stop_scan().await;
    Ok(())
}

/// Connects to a Bluetooth device
///
/// # Arguments
/// * `device_id` - The unique identifier of the device to connect to (platform-specific ID)
#[tauri::command]
pub async fn connect_to_device(device_id: String, app_state: State<'_, AppState>) -> Result<bool, String> {
    Ok(app_state.bluetooth.connect_to_device(&device_id).await)
}

#[tauri::command]
pub async fn disconnect_from_device(device_id: String, app_state: State<'_, AppState>) -> Result<bool, String> {
    Ok(app_state.bluetooth.disconnect_from_device(&device_id).await)
}

#[tauri::command]
pub async fn get_discovered_devices(app_state: State<'_, AppState>) -> Result<Vec<BluetoothDevice>, String> {
    Ok(app_state.bluetooth.discovered_devices())
}

#[tauri::command]
pub async fn get_connected_devices(app_state: State<'_, AppState>) -> Result<Vec<BluetoothDevice>, String> {
    Ok(app_state.bluetooth.connected_devices())
}

#[tauri::command]
pub async fn get_scan_status(app_state: State<'_, AppState>) -> Result<BluetoothScanStatus, String> {
    Ok(app_state.bluetooth.scan_status())
}

#[tauri::command]
pub async fn get_connection_status(app_state: State<'_, AppState>) -> Result<BluetoothConnectionStatus, String> {
    Ok(app_state.bluetooth.connection_status())
}

/// Device list component state. `is_loading` is true while the caller shows
/// the scanning spinner.
#[tauri::command]
pub async fn get_device_list(is_loading: bool, app_state: State<'_, AppState>) -> Result<DeviceListView, String> {
    let bluetooth = &app_state.bluetooth;
    Ok(DeviceListView::new(
        &bluetooth.discovered_devices(),
        bluetooth.connection_status(),
        is_loading,
    ))
}
