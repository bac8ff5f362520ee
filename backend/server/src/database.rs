//! # Redis
//!
//! Document store for todos.
//!
//! Every handler talks to the store through [`TodoStore`], a handle that can
//! insert, list, update and delete records by id in one collection. The handle
//! is opened once at startup and shared by every request.
//!
//! ## Requirements
//!
//! - Newest-first listing of the whole collection
//! - Per-record atomic writes, no in-process locking
//! - "Record absent" reported separately from store failures
//!
//! ## Implementation
//!
//! - One string key per todo: `{prefix}:todo:{id}` holding the record as JSON
//! - One sorted set `{prefix}:todos` of ids, scored by a creation sequence
//! - Sequence counter `{prefix}:seq`, bumped with `INCR` on every create so two
//!   todos created within the same millisecond still list in order
//! - Create and delete run as `MULTI` pipelines so the record and its index
//!   entry appear and disappear together
//! - Update writes with `SET ... XX`; an update that loses a race with a
//!   delete reports the record as missing instead of bringing it back
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tracing::debug;
use uuid::Uuid;

use crate::{error::StoreError, models::TodoRecord};

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert(&self, record: TodoRecord) -> Result<TodoRecord, StoreError>;

    /// Whole collection, newest first.
    async fn list(&self) -> Result<Vec<TodoRecord>, StoreError>;

    /// `None` when no record has this key.
    async fn update(&self, key: Uuid, content: String) -> Result<Option<TodoRecord>, StoreError>;

    /// `false` when no record has this key.
    async fn delete(&self, key: Uuid) -> Result<bool, StoreError>;
}

pub struct RedisStore {
    connection: ConnectionManager,
    prefix: String,
}

pub async fn init_redis(redis_url: &str, prefix: &str) -> Result<RedisStore, StoreError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(500));

    let client = Client::open(redis_url)?;
    let connection = client.get_connection_manager_with_config(config).await?;

    Ok(RedisStore {
        connection,
        prefix: prefix.to_string(),
    })
}

impl RedisStore {
    fn todo_key(&self, key: &str) -> String {
        format!("{}:todo:{key}", self.prefix)
    }

    fn index_key(&self) -> String {
        format!("{}:todos", self.prefix)
    }

    fn sequence_key(&self) -> String {
        format!("{}:seq", self.prefix)
    }
}

#[async_trait]
impl TodoStore for RedisStore {
    async fn insert(&self, record: TodoRecord) -> Result<TodoRecord, StoreError> {
        let mut connection = self.connection.clone();
        let id = record.key.to_string();
        let payload = serde_json::to_string(&record)?;

        let sequence: u64 = connection.incr(self.sequence_key(), 1).await?;

        redis::pipe()
            .atomic()
            .set(self.todo_key(&id), payload)
            .ignore()
            .zadd(self.index_key(), &id, sequence)
            .ignore()
            .query_async::<()>(&mut connection)
            .await?;

        debug!(%id, sequence, "Inserted todo");

        Ok(record)
    }

    async fn list(&self) -> Result<Vec<TodoRecord>, StoreError> {
        let mut connection = self.connection.clone();

        let ids: Vec<String> = connection.zrevrange(self.index_key(), 0, -1).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| self.todo_key(id)).collect();
        let payloads: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut connection)
            .await?;

        // A missing payload is a record deleted between the two reads.
        payloads
            .into_iter()
            .flatten()
            .map(|payload| serde_json::from_str(&payload).map_err(StoreError::from))
            .collect()
    }

    async fn update(&self, key: Uuid, content: String) -> Result<Option<TodoRecord>, StoreError> {
        let mut connection = self.connection.clone();
        let todo_key = self.todo_key(&key.to_string());

        let payload: Option<String> = connection.get(&todo_key).await?;
        let Some(payload) = payload else {
            return Ok(None);
        };

        let mut record: TodoRecord = serde_json::from_str(&payload)?;
        record.content = content;
        record.updated_at = Utc::now();

        let written: Option<String> = redis::cmd("SET")
            .arg(&todo_key)
            .arg(serde_json::to_string(&record)?)
            .arg("XX")
            .query_async(&mut connection)
            .await?;

        Ok(written.map(|_| record))
    }

    async fn delete(&self, key: Uuid) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();
        let id = key.to_string();

        let (removed, _unindexed): (u64, u64) = redis::pipe()
            .atomic()
            .del(self.todo_key(&id))
            .zrem(self.index_key(), &id)
            .query_async(&mut connection)
            .await?;

        Ok(removed > 0)
    }
}
