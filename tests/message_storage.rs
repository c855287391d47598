use std::io;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use gazalink_lib::core::sample_data::{add_sample_data, clear_all_data};
use gazalink_lib::core::{DeliveryStatus, FileStore, KeyValueStore, Message, MessageStorage, Priority};
use gazalink_lib::error::{StorageError, StorageResult};
use gazalink_lib::screens::{FormError, MessageForm, MessageQueueView};
use tempfile::tempdir;

fn message(id: &str, priority: Priority, minutes_ago: i64) -> Message {
    let mut msg = Message::new(format!("message {id}"), priority);
    msg.id = id.to_string();
    msg.timestamp = msg.timestamp - Duration::minutes(minutes_ago);
    msg
}

/// Store whose writes always fail.
struct ReadOnlyStore;

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(None)
    }

    async fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Io(io::Error::other("read-only filesystem")))
    }

    async fn remove_item(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Io(io::Error::other("read-only filesystem")))
    }
}

#[tokio::test]
async fn saved_messages_survive_a_new_storage_instance() {
    let dir = tempdir().unwrap();
    let first = message("a", Priority::Normal, 5);
    let second = message("b", Priority::Urgent, 1);

    {
        let storage = MessageStorage::new(FileStore::new(dir.path()));
        storage.save_message(&first).await.unwrap();
        storage.save_message(&second).await.unwrap();
    }

    let reopened = MessageStorage::new(FileStore::new(dir.path()));
    assert_eq!(reopened.get_messages().await, vec![first, second]);
}

#[tokio::test]
async fn update_delete_and_clear() {
    let dir = tempdir().unwrap();
    let storage = MessageStorage::new(FileStore::new(dir.path().join("nested")));
    for msg in [
        message("1", Priority::Normal, 3),
        message("2", Priority::Normal, 2),
        message("3", Priority::Urgent, 1),
    ] {
        storage.save_message(&msg).await.unwrap();
    }

    let mut delivered = message("2", Priority::Normal, 2);
    delivered.delivery_status = DeliveryStatus::Delivered;
    storage.update_message(&delivered).await.unwrap();

    // Unknown ids are a no-op
    storage.update_message(&message("missing", Priority::Urgent, 0)).await.unwrap();
    storage.delete_message("missing").await.unwrap();

    storage.delete_message("1").await.unwrap();
    let remaining = storage.get_messages().await;
    assert_eq!(
        remaining.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
        vec!["2", "3"]
    );
    assert_eq!(remaining[0].delivery_status, DeliveryStatus::Delivered);

    storage.clear_all_messages().await.unwrap();
    assert!(storage.get_messages().await.is_empty());
}

#[tokio::test]
async fn queue_view_lists_urgent_first() {
    let dir = tempdir().unwrap();
    let storage = MessageStorage::new(FileStore::new(dir.path()));
    storage.save_message(&message("old-normal", Priority::Normal, 30)).await.unwrap();
    storage.save_message(&message("new-urgent", Priority::Urgent, 1)).await.unwrap();
    storage.save_message(&message("old-urgent", Priority::Urgent, 10)).await.unwrap();

    let view = MessageQueueView::load(&storage).await;
    let ids: Vec<&str> = view.rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["old-urgent", "new-urgent", "old-normal"]);
    assert!(view.empty_state.is_none());
    assert_eq!(view.rows[0].priority_label, "URGENT");
}

#[tokio::test]
async fn corrupt_blob_reads_as_empty_and_is_replaced() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path());
    store.set_item("@gazalink_messages", "{not json").await.unwrap();

    let storage = MessageStorage::new(store);
    assert!(storage.get_messages().await.is_empty());

    let msg = message("fresh", Priority::Normal, 0);
    storage.save_message(&msg).await.unwrap();
    assert_eq!(storage.get_messages().await, vec![msg]);
}

#[tokio::test]
async fn sample_data_replaces_existing_messages() {
    let dir = tempdir().unwrap();
    let storage = MessageStorage::new(FileStore::new(dir.path()));
    storage.save_message(&message("mine", Priority::Normal, 0)).await.unwrap();

    add_sample_data(&storage).await;
    let messages = storage.get_messages().await;
    assert_eq!(messages.len(), 4);
    assert!(messages.iter().all(|m| m.id != "mine"));

    clear_all_data(&storage).await;
    assert!(storage.get_messages().await.is_empty());
}

#[tokio::test]
async fn submit_reports_save_failure_and_keeps_the_form() {
    let storage = MessageStorage::new(ReadOnlyStore);
    let mut form = MessageForm::new("Need water at the north shelter", Priority::Urgent);

    let result = form.submit(&storage).await;
    assert_eq!(result.unwrap_err(), FormError::SaveFailed);
    assert_eq!(form.content, "Need water at the north shelter");
    assert_eq!(form.priority, Priority::Urgent);
}

#[tokio::test]
async fn submit_trims_and_resets() {
    let dir = tempdir().unwrap();
    let storage = MessageStorage::new(FileStore::new(dir.path()));
    let mut form = MessageForm::new("  hello  ", Priority::Urgent);

    let saved = form.submit(&storage).await.unwrap();
    assert_eq!(saved.content, "hello");
    assert_eq!(saved.delivery_status, DeliveryStatus::Pending);
    assert!(saved.timestamp <= Utc::now());
    assert_eq!(form, MessageForm::default());
    assert_eq!(storage.get_messages().await, vec![saved]);
}

#[tokio::test]
async fn update_and_delete_touch_every_copy_of_an_id() {
    let dir = tempdir().unwrap();
    let storage = MessageStorage::new(FileStore::new(dir.path()));
    let first = message("a", Priority::Normal, 1);
    let other = message("c", Priority::Normal, 1);
    let mut repeat = first.clone();
    repeat.content = "same id, second copy".to_string();
    for msg in [&first, &other, &repeat] {
        storage.save_message(msg).await.unwrap();
    }

    let mut sent = first.clone();
    sent.delivery_status = DeliveryStatus::Sent;
    storage.update_message(&sent).await.unwrap();
    let statuses: Vec<(String, DeliveryStatus)> = storage
        .get_messages()
        .await
        .into_iter()
        .map(|m| (m.id, m.delivery_status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("a".to_string(), DeliveryStatus::Sent),
            ("c".to_string(), DeliveryStatus::Pending),
            ("a".to_string(), DeliveryStatus::Sent),
        ]
    );

    storage.delete_message("a").await.unwrap();
    let ids: Vec<String> = storage.get_messages().await.into_iter().map(|m| m.id).collect();
    assert_eq!(ids, vec!["c"]);
}

#[tokio::test]
async fn sorted_view_keeps_save_order_for_equal_keys() {
    let dir = tempdir().unwrap();
    let storage = MessageStorage::new(FileStore::new(dir.path()));
    let base = message("x", Priority::Normal, 0);
    for (id, priority) in [
        ("n1", Priority::Normal),
        ("u1", Priority::Urgent),
        ("n2", Priority::Normal),
        ("u2", Priority::Urgent),
    ] {
        let mut msg = base.clone();
        msg.id = id.to_string();
        msg.priority = priority;
        storage.save_message(&msg).await.unwrap();
    }

    let ids: Vec<String> = storage
        .get_sorted_messages()
        .await
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec!["u1", "u2", "n1", "n2"]);
}
