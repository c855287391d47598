pub mod bluetooth_config;
pub mod storage_config;

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::utils::ensure_directory_exists;

pub use bluetooth_config::BluetoothConfig;
pub use storage_config::StorageConfig;

const CONFIG_FILE_NAME: &str = "gazalink_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub bluetooth: BluetoothConfig,
    /// `env_logger`-style filter, e.g. `info` or `warn,gazalink_lib=debug`.
    /// Per-target directives apply to both the console and frontend loggers.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            storage: StorageConfig::default(),
            bluetooth: BluetoothConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn file_path(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE_NAME)
    }

    /// Loads the config from `config_dir`, falling back to defaults when the
    /// file does not exist.
    pub async fn load_config(config_dir: &Path) -> Result<Self> {
        let file_path = Self::file_path(config_dir);

        if !fs::try_exists(&file_path).await? {
            warn!("Config file not found at {:?}, using default.", file_path);
            return Ok(Self::default());
        }

        let config_json = fs::read_to_string(&file_path).await?;
        let config: Self = serde_json::from_str(&config_json)?;

        info!("Config loaded from {:?}", file_path);
        Ok(config)
    }

    /// Saves the current config into `config_dir`.
    pub async fn save_config(&self, config_dir: &Path) -> Result<()> {
        ensure_directory_exists(config_dir).await?;
        let file_path = Self::file_path(config_dir);

        let config_json = match serde_json::to_string_pretty(&self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize app config to JSON: {}", e);
                return Err(e.into());
            }
        };

        fs::write(&file_path, config_json).await?;
        info!("Config saved to {:?}", file_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_config(dir.path()).await.unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage.messages_key, "@gazalink_messages");
        assert_eq!(config.bluetooth.default_rssi, -100);
        assert!(!config.bluetooth.allow_duplicates);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("nested");
        let mut config = AppConfig::default();
        config.log_level = "debug".into();
        config.bluetooth.allow_duplicates = true;
        config.bluetooth.service_uuids = vec![uuid::Uuid::from_u128(0x180f)];

        config.save_config(&config_dir).await.unwrap();
        let loaded = AppConfig::load_config(&config_dir).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(
            AppConfig::file_path(dir.path()),
            r#"{ "bluetooth": { "default_rssi": -90 } }"#,
        )
        .await
        .unwrap();

        let config = AppConfig::load_config(dir.path()).await.unwrap();
        assert_eq!(config.bluetooth.default_rssi, -90);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(AppConfig::file_path(dir.path()), "not json")
            .await
            .unwrap();
        assert!(AppConfig::load_config(dir.path()).await.is_err());
    }
}
