pub mod database;
pub mod kv_store;
pub mod profile_repository;

use kv_store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct Repository {
    pub store: Arc<dyn KeyValueStore>,
    pub profiles: profile_repository::ProfileRepository,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        let pool = Arc::new(pool);
        Self::with_store(Arc::new(SqliteKeyValueStore::new(pool)))
    }

    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            profiles: profile_repository::ProfileRepository::new(store.clone()),
            store,
        }
    }

    pub fn new_memory() -> Self {
        Self::with_store(Arc::new(MemoryKeyValueStore::new()))
    }
}
