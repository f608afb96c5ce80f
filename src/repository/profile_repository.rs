use crate::domain::user::{Bookmark, SessionUser};
use crate::repository::kv_store::KeyValueStore;
use crate::services::error_handling::CatalogError;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub const CURRENT_USER_KEY: &str = "currentUser";

pub fn history_key(display_name: &str) -> String {
    format!("history_{}", display_name)
}

pub fn bookmarks_key(display_name: &str) -> String {
    format!("bookmarks_{}", display_name)
}

/// Typed access to the session record and per-user collections.
#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load_session(&self) -> Result<Option<SessionUser>> {
        self.read_json(CURRENT_USER_KEY).await
    }

    pub async fn save_session(&self, user: &SessionUser) -> Result<()> {
        self.write_json(CURRENT_USER_KEY, user).await
    }

    pub async fn clear_session(&self) -> Result<()> {
        self.store
            .remove(CURRENT_USER_KEY)
            .await
            .map_err(|e| storage_error(format!("remove {}", CURRENT_USER_KEY), e))
    }

    pub async fn load_history(&self, display_name: &str) -> Result<Vec<String>> {
        Ok(self.read_json(&history_key(display_name)).await?.unwrap_or_default())
    }

    pub async fn save_history(&self, display_name: &str, history: &[String]) -> Result<()> {
        self.write_json(&history_key(display_name), &history).await
    }

    pub async fn load_bookmarks(&self, display_name: &str) -> Result<Vec<Bookmark>> {
        Ok(self.read_json(&bookmarks_key(display_name)).await?.unwrap_or_default())
    }

    pub async fn save_bookmarks(&self, display_name: &str, bookmarks: &[Bookmark]) -> Result<()> {
        self.write_json(&bookmarks_key(display_name), &bookmarks).await
    }

    /// Missing keys and unparseable values both read as `None`.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let stored = self
            .store
            .get(key)
            .await
            .map_err(|e| storage_error(format!("read {}", key), e))?;
        let Some(raw) = stored else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(source) => {
                let err = CatalogError::MalformedRecord {
                    key: key.to_string(),
                    source,
                };
                warn!(key = %key, error = %err, "Ignoring malformed stored record");
                Ok(None)
            }
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store
            .set(key, &json)
            .await
            .map_err(|e| storage_error(format!("write {}", key), e))?;
        debug!(key = %key, bytes = json.len(), "Stored record");
        Ok(())
    }
}

fn storage_error(operation: String, source: anyhow::Error) -> anyhow::Error {
    CatalogError::Storage { operation, source }.into()
}
