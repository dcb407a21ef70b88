use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::sync::Arc;

use crate::models::{Message, Profile};
use crate::services::store::{MessageStore, ProfileStore, StoreError};

/// Redis-backed profile and message store
///
/// Profiles live in one hash keyed by id, with a list recording insertion
/// order. Messages are a single list of JSON documents.
pub struct RedisStore {
    // Store ConnectionManager in a Mutex for interior mutability
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    keys: RedisKeys,
}

impl RedisStore {
    /// Connect to Redis
    pub async fn new(redis_url: &str, key_prefix: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            keys: RedisKeys::new(key_prefix),
        })
    }
}

#[async_trait]
impl ProfileStore for RedisStore {
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let mut conn = self.redis.lock().await;
        let ids: Vec<String> = redis::cmd("LRANGE")
            .arg(self.keys.profile_order())
            .arg(0)
            .arg(-1)
            .query_async(&mut *conn)
            .await?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let documents: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(self.keys.profiles())
            .arg(&ids)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        let mut profiles = Vec::with_capacity(documents.len());
        for json in documents.into_iter().flatten() {
            profiles.push(serde_json::from_str(&json)?);
        }

        tracing::trace!("Loaded {} profiles from Redis", profiles.len());
        Ok(profiles)
    }

    async fn find_profile(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let mut conn = self.redis.lock().await;
        let value: Option<String> = redis::cmd("HGET")
            .arg(self.keys.profiles())
            .arg(id)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn append_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let json = serde_json::to_string(profile)?;

        let mut conn = self.redis.lock().await;
        let inserted: bool = redis::cmd("HSETNX")
            .arg(self.keys.profiles())
            .arg(&profile.id)
            .arg(json)
            .query_async(&mut *conn)
            .await?;

        if !inserted {
            return Err(StoreError::Duplicate(profile.id.clone()));
        }

        let pushed: Result<(), redis::RedisError> = redis::cmd("RPUSH")
            .arg(self.keys.profile_order())
            .arg(&profile.id)
            .query_async(&mut *conn)
            .await;

        // A profile missing from the order list would never be listed
        if let Err(e) = pushed {
            tracing::warn!("Rolling back profile {} after failed RPUSH: {}", profile.id, e);
            let _: Result<(), redis::RedisError> = redis::cmd("HDEL")
                .arg(self.keys.profiles())
                .arg(&profile.id)
                .query_async(&mut *conn)
                .await;
            return Err(e.into());
        }

        tracing::trace!("Stored profile {}", profile.id);
        Ok(())
    }

    async fn update_profile(&self, profile: &Profile) -> Result<bool, StoreError> {
        let json = serde_json::to_string(profile)?;

        let mut conn = self.redis.lock().await;
        let exists: bool = redis::cmd("HEXISTS")
            .arg(self.keys.profiles())
            .arg(&profile.id)
            .query_async(&mut *conn)
            .await?;

        if !exists {
            return Ok(false);
        }

        let _: () = redis::cmd("HSET")
            .arg(self.keys.profiles())
            .arg(&profile.id)
            .arg(json)
            .query_async(&mut *conn)
            .await?;

        Ok(true)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        let mut conn = self.redis.lock().await;
        let pong: String = redis::cmd("PING").query_async(&mut *conn).await?;
        Ok(pong == "PONG")
    }
}

#[async_trait]
impl MessageStore for RedisStore {
    async fn append_message(&self, message: &Message) -> Result<(), StoreError> {
        let json = serde_json::to_string(message)?;

        let mut conn = self.redis.lock().await;
        let _: () = redis::cmd("RPUSH")
            .arg(self.keys.messages())
            .arg(json)
            .query_async(&mut *conn)
            .await?;

        Ok(())
    }

    async fn messages_for_user(&self, user_id: &str) -> Result<Vec<Message>, StoreError> {
        let mut conn = self.redis.lock().await;
        let documents: Vec<String> = redis::cmd("LRANGE")
            .arg(self.keys.messages())
            .arg(0)
            .arg(-1)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        let mut messages = Vec::new();
        for json in documents {
            let message: Message = serde_json::from_str(&json)?;
            if message.from_user_id == user_id || message.to_user_id == user_id {
                messages.push(message);
            }
        }

        Ok(messages)
    }
}

/// Redis key builder
#[derive(Debug, Clone)]
pub struct RedisKeys {
    prefix: String,
}

impl RedisKeys {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_end_matches(':').to_string(),
        }
    }

    /// Hash of profile documents keyed by id
    pub fn profiles(&self) -> String {
        format!("{}:profiles", self.prefix)
    }

    /// List of profile ids in insertion order
    pub fn profile_order(&self) -> String {
        format!("{}:profiles:order", self.prefix)
    }

    /// List of message documents
    pub fn messages(&self) -> String {
        format!("{}:messages", self.prefix)
    }
}
