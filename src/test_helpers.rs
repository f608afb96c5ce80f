// Test helpers for integration testing

use crate::app::AppController;
use crate::config::CatalogConfig;
use crate::domain::product::{MATERIAL_KEY, PITCH_KEY, Product, SpecValue};
use crate::repository::Repository;
use crate::repository::kv_store::KeyValueStore;
use crate::services::data_source::SyntheticProductSource;
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::collections::BTreeMap;

pub struct TestContext {
    pub repository: Repository,
    pub config: CatalogConfig,
}

impl TestContext {
    pub fn new_for_test() -> Self {
        let config = CatalogConfig {
            synthetic_seed: Some(7),
            ..CatalogConfig::default()
        };
        Self {
            repository: Repository::new_memory(),
            config,
        }
    }

    pub fn synthetic_source(&self) -> SyntheticProductSource {
        SyntheticProductSource::from_config(&self.config)
    }

    /// Controller bootstrapped from the seeded synthetic catalog.
    pub async fn controller(&self) -> anyhow::Result<AppController> {
        let mut controller = AppController::new(self.config.clone(), &self.repository);
        let source = self.synthetic_source();
        controller.bootstrap(&source, &source).await?;
        Ok(controller)
    }
}

/// Minimal product with a pitch and material, for hand-built fixtures.
pub fn sample_product(
    id: &str,
    category: &str,
    series: &str,
    pitch_mm: f64,
    material: &str,
) -> Product {
    let mut specifications = BTreeMap::new();
    specifications.insert(PITCH_KEY.to_string(), SpecValue::Number(pitch_mm));
    specifications.insert(MATERIAL_KEY.to_string(), SpecValue::from(material));

    Product {
        id: id.to_string(),
        category: category.to_string(),
        series: Some(series.to_string()),
        model: format!("{}-M", id),
        name: format!("{} {} {}", category, series, id),
        specifications,
        features: Vec::new(),
        applications: Vec::new(),
        tsubaki_code: format!("CODE-{}", id),
    }
}

/// Store whose backing database is gone: every call fails.
pub struct UnavailableStore;

#[async_trait]
impl KeyValueStore for UnavailableStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        bail!("database is locked while reading {}", key)
    }

    async fn set(&self, key: &str, _value: &str) -> Result<()> {
        bail!("database is locked while writing {}", key)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        bail!("database is locked while removing {}", key)
    }
}

/// Store that reads as empty but rejects every write.
pub struct ReadOnlyStore;

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, key: &str, _value: &str) -> Result<()> {
        bail!("attempt to write a readonly database ({})", key)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        bail!("attempt to write a readonly database ({})", key)
    }
}
