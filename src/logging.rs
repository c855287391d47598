//! Logging setup.
//! Everything logs through the `log` facade. Headless builds install
//! `env_logger`; the desktop shell installs [`TauriLogger`], which also
//! forwards every record to the frontend.

use env_logger::filter::{Builder as FilterBuilder, Filter};

/// The configured filter with `RUST_LOG` appended, so its directives win
/// for the targets it names.
pub fn directives(configured: &str) -> String {
    match std::env::var("RUST_LOG") {
        Ok(env_filter) if !env_filter.is_empty() => format!("{},{}", configured, env_filter),
        _ => configured.to_string(),
    }
}

/// Installs `env_logger` with an `env_logger`-style filter string such as
/// `info` or `gazalink_lib=debug`. `RUST_LOG`, when set, takes precedence.
/// Calling it twice is harmless.
pub fn init_logging(filter: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&directives(filter));
    if builder.try_init().is_ok() {
        log::debug!("Logging initialized with filter {:?}", filter);
    }
}

/// Parses `env_logger`-style directives into a per-target filter for
/// loggers other than `env_logger` itself.
pub fn build_filter(directives: &str) -> Filter {
    FilterBuilder::new().parse(directives).build()
}

#[cfg(feature = "desktop")]
pub use tauri_logger::{LogMessage, TauriLogger};

#[cfg(feature = "desktop")]
mod tauri_logger {
    use std::sync::OnceLock;

    use chrono::Local;
    use env_logger::filter::Filter;
    use log::{Metadata, Record, SetLoggerError};
    use serde::Serialize;
    use tauri::Emitter;

    static LOGGER: OnceLock<TauriLogger> = OnceLock::new();

    /// Event name log records are emitted under.
    pub const LOG_EVENT: &str = "log-message";

    #[derive(Debug, Serialize, Clone)]
    pub struct LogMessage {
        level: String,
        target: String,
        message: String,
        timestamp: String,
    }

    pub struct TauriLogger {
        app_handle: tauri::AppHandle,
        filter: Filter,
    }

    impl TauriLogger {
        /// Installs the logger globally. Fails if a logger is already set.
        pub fn init(app_handle: tauri::AppHandle, filter: Filter) -> Result<(), SetLoggerError> {
            let logger = LOGGER.get_or_init(|| TauriLogger { app_handle, filter });
            log::set_logger(logger).map(|()| log::set_max_level(logger.filter.filter()))
        }

        fn emit_log(&self, record: &Record) {
            let log_message = LogMessage {
                level: record.level().to_string(),
                target: record.target().to_string(),
                message: record.args().to_string(),
                timestamp: Local::now().to_rfc3339(),
            };

            if let Err(e) = self.app_handle.emit(LOG_EVENT, log_message) {
                eprintln!("Failed to emit log message: {}", e);
            }
        }
    }

    impl log::Log for TauriLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            self.filter.enabled(metadata)
        }

        fn log(&self, record: &Record) {
            if self.filter.matches(record) {
                eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
                self.emit_log(record);
            }
        }

        fn flush(&self) {}
    }
}
