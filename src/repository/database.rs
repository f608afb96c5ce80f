use anyhow::{Context, Result};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use std::path::Path;
use tokio::fs;
use tracing::info;

pub async fn init_database(db_path: &str) -> Result<SqlitePool> {
    // Ensure the directory exists
    if let Some(parent) = Path::new(db_path).parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let db_url = format!("sqlite://{}", db_path);

    if !Sqlite::database_exists(&db_url).await? {
        info!(path = %db_path, "Creating new catalog storage database");
        Sqlite::create_database(&db_url)
            .await
            .with_context(|| format!("Failed to create database at {}", db_path))?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run storage migrations")?;
    info!(path = %db_path, "Storage migrations completed");

    Ok(pool)
}

pub async fn init_test_database() -> Result<SqlitePool> {
    // A single connection keeps every query on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_test_database() {
        let pool = init_test_database().await.unwrap();

        let result =
            sqlx::query("SELECT name FROM sqlite_master WHERE type='table' AND name='kv_store'")
                .fetch_all(&pool)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_init_database_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("catalog.db");

        let pool = init_database(db_path.to_str().unwrap()).await.unwrap();
        pool.close().await;

        assert!(db_path.exists());
    }
}
