//! Message persistence.
//! All messages live in a single JSON array under one storage key. Every
//! mutation is a full read-modify-write of that array.

use log::{error, info};
use tokio::sync::Mutex;

use crate::core::message::{sort_for_queue, Message};
use crate::core::storage::kv::KeyValueStore;
use crate::error::StorageResult;

/// Default key the message array is stored under.
pub const MESSAGES_STORAGE_KEY: &str = "@gazalink_messages";

pub struct MessageStorage<S: KeyValueStore> {
    store: S,
    key: String,
    /// Serializes read-modify-write cycles issued through this instance.
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> MessageStorage<S> {
    /// Creates a storage over `store` using the default key.
    pub fn new(store: S) -> Self {
        Self::with_key(store, MESSAGES_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads all messages. Read or parse failures are logged and yield an
    /// empty list.
    pub async fn get_messages(&self) -> Vec<Message> {
        match self.read_all().await {
            Ok(messages) => messages,
            Err(e) => {
                error!("Error getting messages from storage: {}", e);
                Vec::new()
            }
        }
    }

    /// Appends one message.
    pub async fn save_message(&self, message: &Message) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut messages = self.get_messages().await;
        messages.push(message.clone());
        self.write_all(&messages).await.inspect_err(|e| {
            error!("Error saving message to storage: {}", e);
        })
    }

    /// Replaces every stored message whose id matches `updated.id`.
    pub async fn update_message(&self, updated: &Message) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let messages: Vec<Message> = self
            .get_messages()
            .await
            .into_iter()
            .map(|m| if m.id == updated.id { updated.clone() } else { m })
            .collect();
        self.write_all(&messages).await.inspect_err(|e| {
            error!("Error updating message in storage: {}", e);
        })
    }

    /// Removes every stored message with the given id.
    pub async fn delete_message(&self, message_id: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut messages = self.get_messages().await;
        messages.retain(|m| m.id != message_id);
        self.write_all(&messages).await.inspect_err(|e| {
            error!("Error deleting message from storage: {}", e);
        })
    }

    /// Removes the whole message array.
    pub async fn clear_all_messages(&self) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove_item(&self.key).await.inspect_err(|e| {
            error!("Error clearing messages from storage: {}", e);
        })?;
        info!("Cleared messages stored under {}", self.key);
        Ok(())
    }

    /// Loads all messages in queue order.
    pub async fn get_sorted_messages(&self) -> Vec<Message> {
        let mut messages = self.get_messages().await;
        sort_for_queue(&mut messages);
        messages
    }

    async fn read_all(&self) -> StorageResult<Vec<Message>> {
        match self.store.get_item(&self.key).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_all(&self, messages: &[Message]) -> StorageResult<()> {
        let json = serde_json::to_string(messages)?;
        self.store.set_item(&self.key, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{DeliveryStatus, Priority};
    use crate::core::storage::kv::MemoryStore;

    #[tokio::test]
    async fn empty_store_loads_empty() {
        let storage = MessageStorage::new(MemoryStore::new());
        assert!(storage.get_messages().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_json_loads_empty() {
        let store = MemoryStore::new();
        store.set_item(MESSAGES_STORAGE_KEY, "{not json").await.unwrap();
        let storage = MessageStorage::new(store);
        assert!(storage.get_messages().await.is_empty());
    }

    #[tokio::test]
    async fn update_replaces_matching_id_only() {
        let storage = MessageStorage::new(MemoryStore::new());
        let first = Message::new("first", Priority::Normal);
        let second = Message::new("second", Priority::Normal);
        storage.save_message(&first).await.unwrap();
        storage.save_message(&second).await.unwrap();

        let mut sent = first.clone();
        sent.delivery_status = DeliveryStatus::Sent;
        storage.update_message(&sent).await.unwrap();

        let messages = storage.get_messages().await;
        assert_eq!(messages, vec![sent, second]);
    }

    #[tokio::test]
    async fn update_of_unknown_id_changes_nothing() {
        let storage = MessageStorage::new(MemoryStore::new());
        let msg = Message::new("only", Priority::Urgent);
        storage.save_message(&msg).await.unwrap();

        let stranger = Message::new("stranger", Priority::Normal);
        storage.update_message(&stranger).await.unwrap();
        assert_eq!(storage.get_messages().await, vec![msg]);
    }

    #[tokio::test]
    async fn custom_key_is_isolated() {
        let storage = MessageStorage::with_key(MemoryStore::new(), "other");
        storage
            .save_message(&Message::new("x", Priority::Normal))
            .await
            .unwrap();
        assert!(storage.store().get_item(MESSAGES_STORAGE_KEY).await.unwrap().is_none());
        assert!(storage.store().get_item("other").await.unwrap().is_some());
    }
}
