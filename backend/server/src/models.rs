//! # Todo Shapes
//!
//! Two views of the same entity.
//!
//! - [`TodoRecord`]: what the store persists, keyed by a [`Uuid`].
//! - [`Todo`]: what clients see. The key becomes a plain `id` string and the
//!   field names are camelCase.
//!
//! Handlers only ever serialize [`Todo`], so the storage key format stays an
//! internal detail of the database module.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub key: Uuid,
    pub content: String,
    pub origin_ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoRecord {
    pub fn new(content: String, origin_ip: Option<String>) -> Self {
        let now = Utc::now();

        Self {
            key: Uuid::new_v4(),
            content,
            origin_ip,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub content: String,
    pub origin_ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TodoRecord> for Todo {
    fn from(record: TodoRecord) -> Self {
        Self {
            id: record.key.to_string(),
            content: record.content,
            origin_ip: record.origin_ip,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Body of create and update requests. `todoContent` is the field name older
/// frontends send.
#[derive(Debug, Default, Deserialize)]
pub struct TodoInput {
    #[serde(default, alias = "todoContent")]
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            message: None,
            data: Some(data),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn test_todo_hides_storage_key() {
        let record = TodoRecord::new("buy milk".to_string(), Some("10.0.0.7".to_string()));
        let id = record.key.to_string();

        let value = serde_json::to_value(Todo::from(record)).unwrap();

        assert_eq!(value["id"], Value::String(id));
        assert_eq!(value["content"], "buy milk");
        assert_eq!(value["originIp"], "10.0.0.7");
        assert!(value.get("key").is_none());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }

    #[test]
    fn test_input_accepts_legacy_field() {
        let input: TodoInput = serde_json::from_value(json!({ "todoContent": "walk" })).unwrap();
        assert_eq!(input.content.as_deref(), Some("walk"));

        let input: TodoInput = serde_json::from_value(json!({})).unwrap();
        assert!(input.content.is_none());
    }

    #[test]
    fn test_envelope_skips_empty_fields() {
        let value = serde_json::to_value(Envelope::<()>::message("Todo deleted")).unwrap();
        assert_eq!(value, json!({ "message": "Todo deleted" }));

        let value = serde_json::to_value(Envelope::data(vec![1, 2]).with_message("ok")).unwrap();
        assert_eq!(value, json!({ "message": "ok", "data": [1, 2] }));
    }
}
