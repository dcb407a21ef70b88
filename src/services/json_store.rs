use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::models::{Message, Profile};
use crate::services::store::{MessageStore, ProfileStore, StoreError};

const USERS_FILE: &str = "users.json";
const MESSAGES_FILE: &str = "messages.json";

/// Flat-file store keeping each collection as a pretty-printed JSON array
///
/// Every write is a read-modify-write of the whole file, serialized by a
/// per-store lock and committed with a rename so readers never see a partial
/// file.
pub struct JsonFileStore {
    users_path: PathBuf,
    messages_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store rooted at `data_dir`, creating missing files as `[]`
    pub async fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, StoreError> {
        let dir = data_dir.as_ref();
        tokio::fs::create_dir_all(dir).await.map_err(|e| io_error(dir, e))?;

        let store = Self {
            users_path: dir.join(USERS_FILE),
            messages_path: dir.join(MESSAGES_FILE),
            write_lock: Mutex::new(()),
        };

        for path in [&store.users_path, &store.messages_path] {
            if !tokio::fs::try_exists(path).await.map_err(|e| io_error(path, e))? {
                write_array::<Profile>(path, &[]).await?;
                tracing::info!("Created {}", path.display());
            }
        }

        Ok(store)
    }
}

#[async_trait]
impl ProfileStore for JsonFileStore {
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        read_array(&self.users_path).await
    }

    async fn find_profile(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let profiles: Vec<Profile> = read_array(&self.users_path).await?;
        Ok(profiles.into_iter().find(|p| p.id == id))
    }

    async fn append_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut profiles: Vec<Profile> = read_array(&self.users_path).await?;
        if profiles.iter().any(|p| p.id == profile.id) {
            return Err(StoreError::Duplicate(profile.id.clone()));
        }
        profiles.push(profile.clone());
        write_array(&self.users_path, &profiles).await
    }

    async fn update_profile(&self, profile: &Profile) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut profiles: Vec<Profile> = read_array(&self.users_path).await?;
        match profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(slot) => *slot = profile.clone(),
            None => return Ok(false),
        }
        write_array(&self.users_path, &profiles).await?;
        Ok(true)
    }
}

#[async_trait]
impl MessageStore for JsonFileStore {
    async fn append_message(&self, message: &Message) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut messages: Vec<Message> = read_array(&self.messages_path).await?;
        messages.push(message.clone());
        write_array(&self.messages_path, &messages).await
    }

    async fn messages_for_user(&self, user_id: &str) -> Result<Vec<Message>, StoreError> {
        let messages: Vec<Message> = read_array(&self.messages_path).await?;
        Ok(messages
            .into_iter()
            .filter(|m| m.from_user_id == user_id || m.to_user_id == user_id)
            .collect())
    }
}

/// Read a JSON array; a missing file reads as empty, a corrupt one is an error
async fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_error(path, e)),
    };

    serde_json::from_slice(&raw).map_err(|e| {
        tracing::error!("Error reading {}: {}", path.display(), e);
        StoreError::from(e)
    })
}

async fn write_array<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(items)?;
    let tmp = path.with_extension("json.tmp");

    tokio::fs::write(&tmp, json).await.map_err(|e| io_error(&tmp, e))?;
    tokio::fs::rename(&tmp, path).await.map_err(|e| io_error(path, e))?;
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}
