//! Demo data for populating an empty queue.

use chrono::{DateTime, Duration, Utc};
use log::{error, info};

use crate::core::message::{now_millis, DeliveryStatus, Message, Priority};
use crate::core::storage::{KeyValueStore, MessageStorage};

/// The fixed demo messages, timestamped relative to `now`.
pub fn sample_messages(now: DateTime<Utc>) -> Vec<Message> {
    let sample = |id: &str, content: &str, priority, age: Duration, status| Message {
        id: id.to_string(),
        content: content.to_string(),
        priority,
        timestamp: now - age,
        delivery_status: status,
    };

    vec![
        sample(
            "1",
            "Emergency: Need medical supplies at location A",
            Priority::Urgent,
            Duration::hours(1),
            DeliveryStatus::Pending,
        ),
        sample(
            "2",
            "Status update: All clear in sector B",
            Priority::Normal,
            Duration::hours(2),
            DeliveryStatus::Sent,
        ),
        sample(
            "3",
            "Water distribution scheduled for tomorrow at 9 AM",
            Priority::Normal,
            Duration::minutes(30),
            DeliveryStatus::Delivered,
        ),
        sample(
            "4",
            "URGENT: Power outage in building C, need backup generator",
            Priority::Urgent,
            Duration::zero(),
            DeliveryStatus::Pending,
        ),
    ]
}

/// Replaces the stored queue with the demo messages. Failures are logged.
pub async fn add_sample_data<S: KeyValueStore>(storage: &MessageStorage<S>) {
    let result = async {
        storage.clear_all_messages().await?;
        for message in sample_messages(now_millis()) {
            storage.save_message(&message).await?;
        }
        Ok::<_, crate::error::StorageError>(())
    }
    .await;

    match result {
        Ok(()) => info!("Sample data added successfully"),
        Err(e) => error!("Error adding sample data: {}", e),
    }
}

/// Removes every stored message. Failures are logged.
pub async fn clear_all_data<S: KeyValueStore>(storage: &MessageStorage<S>) {
    match storage.clear_all_messages().await {
        Ok(()) => info!("All data cleared successfully"),
        Err(e) => error!("Error clearing data: {}", e),
    }
}
