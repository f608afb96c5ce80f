use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::domain::pagination::DEFAULT_PAGE_SIZE;
use crate::domain::user::DEFAULT_HISTORY_LIMIT;

pub const DEFAULT_SOURCE_URL: &str = "https://ppl-ai-code-interpreter-files.s3.amazonaws.com/web/direct-files/45eddab68ce2b005c5a899efc3cad59c/45b16cfd-cd75-478b-854a-40e5e8c8a30f/0aeef7cb.json";

/// One category of the catalog with its advertised product count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTarget {
    pub name: String,
    pub target: usize,
    #[serde(default)]
    pub description: String,
}

impl CategoryTarget {
    pub fn new(name: &str, target: usize, description: &str) -> Self {
        Self {
            name: name.to_string(),
            target,
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminCredentials {
    pub id: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Remote JSON document with a `products` array
    pub source_url: String,

    /// Deadline for the remote fetch before falling back to synthetic data
    pub fetch_timeout_ms: u64,

    pub page_size: usize,

    pub history_limit: usize,

    /// Upper bound on synthetic products generated per category
    pub per_category_cap: usize,

    /// Seed for the randomized synthetic fields; random when unset
    pub synthetic_seed: Option<u64>,

    pub database_path: String,

    pub admin: AdminCredentials,

    pub categories: Vec<CategoryTarget>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            fetch_timeout_ms: 5000,
            page_size: DEFAULT_PAGE_SIZE,
            history_limit: DEFAULT_HISTORY_LIMIT,
            per_category_cap: 100,
            synthetic_seed: None,
            database_path: "catalog.db".to_string(),
            admin: AdminCredentials {
                id: "admin".to_string(),
                password: "admin".to_string(),
            },
            categories: default_categories(),
        }
    }
}

pub fn default_categories() -> Vec<CategoryTarget> {
    vec![
        CategoryTarget::new(
            "Drive Chain",
            98,
            "High quality drive chain for industrial power transmission",
        ),
        CategoryTarget::new(
            "Sprocket",
            11953,
            "Precision machined sprockets compatible with a wide range of chains",
        ),
        CategoryTarget::new("Conveyor Chain", 20, "Conveyor chain for material handling systems"),
        CategoryTarget::new(
            "Timing Belt",
            40,
            "Timing belts for accurate synchronous power transmission",
        ),
        CategoryTarget::new("Reducer", 7, "Reducers for efficient speed control"),
        CategoryTarget::new("Coupling", 9, "Couplings for shaft connection"),
        CategoryTarget::new(
            "Linear Actuator",
            8,
            "Linear actuators for straight-line motion control",
        ),
        CategoryTarget::new("Cable Carrier", 5, "Cable carriers for cable protection"),
    ]
}

impl CatalogConfig {
    /// Load configuration from the default location, creating it when missing.
    /// `CATALOG_SOURCE_URL` and `CATALOG_DB_PATH` override the file.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            let config: Self = toml::from_str(&content)
                .with_context(|| format!("Invalid config at {}", path.display()))?;
            Ok(config)
        } else {
            let default_config = Self::default();
            default_config.save_to(path)?;
            Ok(default_config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("parts-catalog").join("config.toml"))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("CATALOG_SOURCE_URL") {
            self.source_url = url;
        }
        if let Ok(path) = std::env::var("CATALOG_DB_PATH") {
            self.database_path = path;
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Number of products the synthetic generator will produce.
    pub fn synthetic_total(&self) -> usize {
        self.categories
            .iter()
            .map(|c| c.target.min(self.per_category_cap))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
        assert_eq!(config.synthetic_total(), 287);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parts-catalog").join("config.toml");

        let config = CatalogConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, CatalogConfig::default());

        let reloaded = CatalogConfig::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
page_size = 10
synthetic_seed = 7

[[categories]]
name = "Coupling"
target = 3
"#,
        )
        .unwrap();

        let config = CatalogConfig::load_from(&path).unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.synthetic_seed, Some(7));
        assert_eq!(config.fetch_timeout_ms, 5000);
        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.synthetic_total(), 3);
    }
}
