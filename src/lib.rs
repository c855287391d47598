//! GazaLink library
//! Offline Bluetooth P2P message queue: on-device message storage, a BLE
//! discovery/connection service and the view models of the app's screens.

// Module declarations
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod screens;
pub mod utils;

#[cfg(feature = "desktop")]
pub mod commands;
#[cfg(feature = "desktop")]
pub mod state;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use log::{error, info};
    use tauri::Manager;

    use crate::config::AppConfig;
    use crate::logging::TauriLogger;
    use crate::state::AppState;

    tauri::Builder::default()
        // Register our commands
        .invoke_handler(tauri::generate_handler![
            commands::get_messages,
            commands::get_sorted_messages,
            commands::save_message,
            commands::update_message,
            commands::delete_message,
            commands::clear_all_messages,
            commands::create_message,
            commands::get_queue_view,
            commands::get_dashboard,
            commands::add_sample_data,
            commands::clear_all_data,
            commands::initialize_bluetooth,
            commands::is_bluetooth_enabled,
            commands::start_scan,
            commands::stop_scan,
            commands::connect_to_device,
            commands::disconnect_from_device,
            commands::get_discovered_devices,
            commands::get_connected_devices,
            commands::get_scan_status,
            commands::get_connection_status,
            commands::get_device_list,
        ])
        // Setup our application state
        .setup(|app| {
            let config_dir = app.path().app_config_dir()?;
            let config = tauri::async_runtime::block_on(AppConfig::load_config(&config_dir))
                .unwrap_or_else(|e| {
                    eprintln!("Failed to load config, using default: {}", e);
                    AppConfig::default()
                });

            // Fall back to env_logger only if the frontend logger cannot be installed
            let filter = logging::build_filter(&logging::directives(&config.log_level));
            if TauriLogger::init(app.handle().clone(), filter).is_err() {
                logging::init_logging(&config.log_level);
            }

            let app_state = tauri::async_runtime::block_on(AppState::new(app.handle(), config))
                .map_err(|e| format!("Failed to initialize AppState: {}", e))?;

            if let Some(events) = app_state.take_bluetooth_events() {
                commands::forward_bluetooth_events(app.handle().clone(), events);
            }
            app.manage(app_state);
            info!("GazaLink started.");
            Ok(())
        })
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::Destroyed = event {
                if let Some(state) = window.try_state::<AppState>() {
                    let bluetooth = state.bluetooth.clone();
                    tauri::async_runtime::spawn(async move {
                        bluetooth.destroy().await;
                    });
                }
            }
        })
        .run(tauri::generate_context!())
        .unwrap_or_else(|e| error!("error while running tauri application: {}", e));
}
