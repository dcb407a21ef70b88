use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Message, Profile};

/// Errors that can occur in any storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Duplicate id: {0}")]
    Duplicate(String),
}

/// Profile records keyed by id
///
/// `list_profiles` returns profiles in insertion order; ranking relies on it
/// for tie-breaking.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError>;

    async fn find_profile(&self, id: &str) -> Result<Option<Profile>, StoreError>;

    async fn append_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    /// Replace a stored profile; returns `false` when the id is unknown
    async fn update_profile(&self, profile: &Profile) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

/// Append-only message log
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn append_message(&self, message: &Message) -> Result<(), StoreError>;

    /// Messages sent or received by `user_id`, in insertion order
    async fn messages_for_user(&self, user_id: &str) -> Result<Vec<Message>, StoreError>;
}
