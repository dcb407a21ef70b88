use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::models::{Message, Profile};
use crate::services::store::{MessageStore, ProfileStore, StoreError};

/// PostgreSQL-backed profile and message store
///
/// Profiles are stored whole as JSONB documents so quiz fields the service
/// does not model survive updates. A `seq` column preserves insertion order.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

#[async_trait]
impl ProfileStore for PostgresClient {
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let query = r#"
            SELECT document
            FROM profiles
            ORDER BY seq ASC
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let profiles = rows
            .iter()
            .map(|row| row.try_get::<Json<Profile>, _>("document").map(|doc| doc.0))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} profiles", profiles.len());
        Ok(profiles)
    }

    async fn find_profile(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let query = r#"
            SELECT document
            FROM profiles
            WHERE id = $1
        "#;

        let row = sqlx::query(query).bind(id).fetch_optional(&self.pool).await?;

        Ok(match row {
            Some(row) => Some(row.try_get::<Json<Profile>, _>("document")?.0),
            None => None,
        })
    }

    async fn append_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO profiles (id, document, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            ON CONFLICT (id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(&profile.id)
            .bind(Json(profile))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Duplicate(profile.id.clone()));
        }

        tracing::debug!("Stored profile {}", profile.id);
        Ok(())
    }

    async fn update_profile(&self, profile: &Profile) -> Result<bool, StoreError> {
        let query = r#"
            UPDATE profiles
            SET document = $2, updated_at = NOW()
            WHERE id = $1
        "#;

        let result = sqlx::query(query)
            .bind(&profile.id)
            .bind(Json(profile))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl MessageStore for PostgresClient {
    async fn append_message(&self, message: &Message) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO messages
                (id, from_user_id, to_user_id, from_user_name, to_user_name, body, sent_at, is_read)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#;

        sqlx::query(query)
            .bind(&message.id)
            .bind(&message.from_user_id)
            .bind(&message.to_user_id)
            .bind(&message.from_user_name)
            .bind(&message.to_user_name)
            .bind(&message.message)
            .bind(message.timestamp)
            .bind(message.read)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Stored message {}: {} -> {}",
            message.id,
            message.from_user_id,
            message.to_user_id
        );

        Ok(())
    }

    async fn messages_for_user(&self, user_id: &str) -> Result<Vec<Message>, StoreError> {
        let query = r#"
            SELECT id, from_user_id, to_user_id, from_user_name, to_user_name, body, sent_at, is_read
            FROM messages
            WHERE from_user_id = $1 OR to_user_id = $1
            ORDER BY seq ASC
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        let messages: Result<Vec<Message>, sqlx::Error> = rows
            .iter()
            .map(|row| {
                Ok(Message {
                    id: row.try_get("id")?,
                    from_user_id: row.try_get("from_user_id")?,
                    to_user_id: row.try_get("to_user_id")?,
                    from_user_name: row.try_get("from_user_name")?,
                    to_user_name: row.try_get("to_user_name")?,
                    message: row.try_get("body")?,
                    timestamp: row.try_get("sent_at")?,
                    read: row.try_get("is_read")?,
                })
            })
            .collect();

        Ok(messages?)
    }
}
