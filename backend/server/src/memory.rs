use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{database::TodoStore, error::StoreError, models::TodoRecord};

/// In-process store. Records are kept in creation order.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<TodoRecord>>,
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert(&self, record: TodoRecord) -> Result<TodoRecord, StoreError> {
        self.records.write().await.push(record.clone());

        Ok(record)
    }

    async fn list(&self) -> Result<Vec<TodoRecord>, StoreError> {
        Ok(self.records.read().await.iter().rev().cloned().collect())
    }

    async fn update(&self, key: Uuid, content: String) -> Result<Option<TodoRecord>, StoreError> {
        let mut records = self.records.write().await;

        Ok(records
            .iter_mut()
            .find(|record| record.key == key)
            .map(|record| {
                record.content = content;
                record.updated_at = Utc::now();
                record.clone()
            }))
    }

    async fn delete(&self, key: Uuid) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;

        match records.iter().position(|record| record.key == key) {
            Some(index) => {
                records.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content: &str) -> TodoRecord {
        TodoRecord::new(content.to_string(), None)
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryStore::default();
        let a = store.insert(record("a")).await.unwrap();
        let b = store.insert(record("b")).await.unwrap();

        let keys: Vec<Uuid> = store.list().await.unwrap().iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![b.key, a.key]);
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let store = MemoryStore::default();
        let original = store.insert(record("draft")).await.unwrap();

        let updated = store
            .update(original.key, "final".to_string())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.key, original.key);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.content, "final");
        assert!(updated.updated_at >= original.updated_at);

        assert!(store.update(Uuid::new_v4(), "x".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_once() {
        let store = MemoryStore::default();
        let keep = store.insert(record("keep")).await.unwrap();
        let gone = store.insert(record("gone")).await.unwrap();

        assert!(store.delete(gone.key).await.unwrap());
        assert!(!store.delete(gone.key).await.unwrap());
        assert_eq!(store.list().await.unwrap(), vec![keep]);
    }
}
