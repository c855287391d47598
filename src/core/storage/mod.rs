//! Persistence of the message queue on top of a key-value store.

mod kv;
mod message_storage;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use message_storage::{MessageStorage, MESSAGES_STORAGE_KEY};
