//! Message data model.
//! Messages are plain records; the queue ordering is recomputed on every read.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the random suffix appended to generated message ids.
const ID_SUFFIX_LEN: usize = 9;

/// Message priority. Urgent messages are queued ahead of normal ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    #[default]
    Normal,
}

impl Priority {
    /// Queue rank, lower goes first.
    fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::Normal => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::Normal => "normal",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    #[default]
    Pending,
    Sent,
    Delivered,
}

impl DeliveryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A queued message as persisted in the message store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub priority: Priority,
    /// Creation time, stored as an ISO-8601 string.
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub delivery_status: DeliveryStatus,
}

impl Message {
    /// Creates a new pending message stamped with the current time.
    pub fn new(content: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: generate_id(),
            content: content.into(),
            priority,
            timestamp: now_millis(),
            delivery_status: DeliveryStatus::Pending,
        }
    }

    /// Queue order: urgent before normal, then oldest first.
    pub fn queue_order(a: &Message, b: &Message) -> Ordering {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    }

    pub fn is_urgent(&self) -> bool {
        self.priority == Priority::Urgent
    }

    pub fn is_pending(&self) -> bool {
        self.delivery_status == DeliveryStatus::Pending
    }
}

/// Current time truncated to the precision timestamps are stored with.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Sorts messages in place into queue order. The sort is stable.
pub fn sort_for_queue(messages: &mut [Message]) {
    messages.sort_by(Message::queue_order);
}

/// Generates a client-side message id: epoch milliseconds followed by a
/// short base-36 random suffix. Ids are not checked for collisions.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    format!("{}{}", millis, random_suffix(ID_SUFFIX_LEN))
}

fn random_suffix(len: usize) -> String {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        out.push(ALPHABET[(n % 36) as usize] as char);
        n /= 36;
    }
    out
}

/// RFC 3339 timestamps with millisecond precision and a `Z` suffix.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64, priority: Priority, id: &str) -> Message {
        Message {
            id: id.to_string(),
            content: format!("message {}", id),
            priority,
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            delivery_status: DeliveryStatus::Pending,
        }
    }

    #[test]
    fn serializes_with_camel_case_and_lowercase_enums() {
        let msg = Message {
            id: "42".into(),
            content: "hello".into(),
            priority: Priority::Urgent,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            delivery_status: DeliveryStatus::Delivered,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "42",
                "content": "hello",
                "priority": "urgent",
                "timestamp": "2024-05-01T10:00:00.000Z",
                "deliveryStatus": "delivered",
            })
        );
    }

    #[test]
    fn accepts_offset_timestamps() {
        let raw = r#"{"id":"1","content":"x","priority":"normal","timestamp":"2024-05-01T12:00:00+02:00","deliveryStatus":"sent"}"#;
        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
        assert_eq!(msg.delivery_status, DeliveryStatus::Sent);
    }

    #[test]
    fn rejects_garbage_timestamps() {
        let raw = r#"{"id":"1","content":"x","priority":"normal","timestamp":"yesterday","deliveryStatus":"sent"}"#;
        assert!(serde_json::from_str::<Message>(raw).is_err());
    }

    #[test]
    fn queue_order_puts_urgent_first_then_oldest() {
        let mut messages = vec![
            at(300, Priority::Normal, "a"),
            at(200, Priority::Urgent, "b"),
            at(100, Priority::Normal, "c"),
            at(400, Priority::Urgent, "d"),
        ];
        sort_for_queue(&mut messages);
        let ids: Vec<_> = messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["b", "d", "c", "a"]);
    }

    #[test]
    fn equal_keys_keep_their_relative_order() {
        let mut messages = vec![
            at(100, Priority::Normal, "a"),
            at(100, Priority::Normal, "c"),
            at(100, Priority::Normal, "b"),
        ];
        sort_for_queue(&mut messages);
        let ids: Vec<_> = messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["a", "c", "b"]);
    }

    #[test]
    fn generated_ids_have_millis_prefix_and_suffix() {
        let before = Utc::now().timestamp_millis();
        let id = generate_id();
        let (prefix, suffix) = id.split_at(id.len() - ID_SUFFIX_LEN);
        assert!(prefix.parse::<i64>().unwrap() >= before);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn new_message_survives_json_unchanged() {
        let msg = Message::new("precise", Priority::Normal);
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(serde_json::from_str::<Message>(&json).unwrap(), msg);
    }

    #[test]
    fn new_message_is_pending() {
        let msg = Message::new("hi", Priority::Urgent);
        assert!(msg.is_pending());
        assert!(msg.is_urgent());
    }
}
