use serde::{Deserialize, Serialize};

use crate::core::storage::MESSAGES_STORAGE_KEY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key the message array is stored under.
    pub messages_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            messages_key: MESSAGES_STORAGE_KEY.to_string(),
        }
    }
}
