use chrono::Local;
use serde::Serialize;

use crate::core::message::Message;
use crate::core::storage::{KeyValueStore, MessageStorage};
use crate::screens::{Route, APP_SUBTITLE};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRow {
    pub id: String,
    pub content: String,
    /// Upper-case priority badge text.
    pub priority_label: String,
    pub is_urgent: bool,
    /// Local wall-clock time the message was created.
    pub time_label: String,
    pub status_label: &'static str,
}

impl From<&Message> for MessageRow {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            content: message.content.clone(),
            priority_label: message.priority.as_str().to_uppercase(),
            is_urgent: message.is_urgent(),
            time_label: message
                .timestamp
                .with_timezone(&Local)
                .format("%H:%M:%S")
                .to_string(),
            status_label: message.delivery_status.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub text: &'static str,
    pub subtext: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageQueueView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub rows: Vec<MessageRow>,
    /// Present when there is nothing to list.
    pub empty_state: Option<EmptyState>,
    pub nav: [Route; 2],
}

impl MessageQueueView {
    /// Builds the view from messages already in queue order.
    pub fn from_sorted(messages: &[Message]) -> Self {
        let rows: Vec<MessageRow> = messages.iter().map(MessageRow::from).collect();
        let empty_state = rows.is_empty().then_some(EmptyState {
            text: "No messages in queue",
            subtext: "Create your first message to get started",
        });
        Self {
            title: Route::MessageQueue.title(),
            subtitle: APP_SUBTITLE,
            rows,
            empty_state,
            nav: Route::MessageQueue.nav_targets(),
        }
    }

    pub async fn load<S: KeyValueStore>(storage: &MessageStorage<S>) -> Self {
        Self::from_sorted(&storage.get_sorted_messages().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Priority;
    use crate::core::storage::MemoryStore;

    #[tokio::test]
    async fn empty_queue_shows_empty_state() {
        let storage = MessageStorage::new(MemoryStore::new());
        let view = MessageQueueView::load(&storage).await;
        assert!(view.rows.is_empty());
        assert_eq!(view.empty_state.unwrap().text, "No messages in queue");
        assert_eq!(view.subtitle, "Offline Bluetooth P2P Communication");
    }

    #[tokio::test]
    async fn rows_follow_queue_order() {
        let storage = MessageStorage::new(MemoryStore::new());
        let normal = Message::new("normal", Priority::Normal);
        let urgent = Message::new("urgent", Priority::Urgent);
        storage.save_message(&normal).await.unwrap();
        storage.save_message(&urgent).await.unwrap();

        let view = MessageQueueView::load(&storage).await;
        assert!(view.empty_state.is_none());
        assert_eq!(view.rows[0].id, urgent.id);
        assert_eq!(view.rows[0].priority_label, "URGENT");
        assert!(view.rows[0].is_urgent);
        assert_eq!(view.rows[1].priority_label, "NORMAL");
        assert_eq!(view.rows[1].status_label, "pending");
        assert_eq!(view.rows[1].time_label.len(), "00:00:00".len());
    }
}
