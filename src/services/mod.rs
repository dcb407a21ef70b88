// Service exports
pub mod json_store;
pub mod notifier;
pub mod postgres;
pub mod queue;
pub mod redis_store;
pub mod store;
pub mod templates;

pub use json_store::JsonFileStore;
pub use notifier::{HttpNotifier, LogNotifier, Notification, Notifier, NotifyError};
pub use postgres::PostgresClient;
pub use queue::NotificationQueue;
pub use redis_store::{RedisKeys, RedisStore};
pub use store::{MessageStore, ProfileStore, StoreError};
