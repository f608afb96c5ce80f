use crate::config::{CatalogConfig, CategoryTarget};
use crate::domain::product::{MATERIAL_KEY, PITCH_KEY, Product, SpecValue};
use crate::services::error_handling::CatalogError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const SERIES: [&str; 5] = ["RS Standard", "LAMBDA", "NEPTUNE", "Super", "Stainless"];
const MATERIALS: [&str; 3] = ["Carbon Steel", "Stainless Steel", "Nickel Plated"];
const PITCHES: [f64; 9] = [6.35, 9.525, 12.7, 15.875, 19.05, 25.4, 31.75, 38.1, 50.8];
const HUB_TYPES: [&str; 3] = ["A", "B", "C"];

/// Anything that can produce the full product list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductSource: Send + Sync {
    fn origin(&self) -> DataOrigin;
    async fn fetch(&self) -> Result<Vec<Product>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Remote,
    Synthetic,
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataOrigin::Remote => f.write_str("remote"),
            DataOrigin::Synthetic => f.write_str("synthetic"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub products: Vec<Product>,
    pub origin: DataOrigin,
    pub elapsed: Duration,
}

/// Remote JSON document. A missing or null `products` field is an empty catalog.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    products: Option<Vec<Product>>,
}

pub struct RemoteProductSource {
    client: reqwest::Client,
    url: String,
}

impl RemoteProductSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl ProductSource for RemoteProductSource {
    fn origin(&self) -> DataOrigin {
        DataOrigin::Remote
    }

    async fn fetch(&self) -> Result<Vec<Product>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CatalogError::SourceFailed {
                source_name: self.origin().to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::SourceFailed {
                source_name: self.origin().to_string(),
                message: format!("HTTP error! status: {}", status),
            }
            .into());
        }

        let document: CatalogDocument = response
            .json()
            .await
            .context("Failed to decode remote catalog document")?;

        Ok(document.products.unwrap_or_default())
    }
}

/// Generates a plausible catalog from the configured category targets.
pub struct SyntheticProductSource {
    categories: Vec<CategoryTarget>,
    per_category_cap: usize,
    seed: Option<u64>,
}

impl SyntheticProductSource {
    pub fn new(
        categories: Vec<CategoryTarget>,
        per_category_cap: usize,
        seed: Option<u64>,
    ) -> Self {
        Self {
            categories,
            per_category_cap,
            seed,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.categories.clone(), config.per_category_cap, config.synthetic_seed)
    }

    pub fn generate(&self) -> Vec<Product> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut products = Vec::new();
        for (cat_index, category) in self.categories.iter().enumerate() {
            let count = category.target.min(self.per_category_cap);
            for i in 0..count {
                products.push(synthetic_product(&mut rng, cat_index, &category.name, i));
            }
        }
        products
    }
}

/// First two letters of the category with its first space removed, upper-cased.
fn category_prefix(category: &str) -> String {
    category
        .replacen(' ', "", 1)
        .chars()
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

fn synthetic_product(rng: &mut StdRng, cat_index: usize, category: &str, i: usize) -> Product {
    let series = SERIES[i % SERIES.len()];
    let prefix = category_prefix(category);

    let mut specifications = BTreeMap::new();
    let pitch = PITCHES[i % PITCHES.len()];
    let material = MATERIALS[i % MATERIALS.len()];
    specifications.insert(PITCH_KEY.to_string(), SpecValue::Number(pitch));
    specifications.insert(MATERIAL_KEY.to_string(), SpecValue::from(material));
    specifications.insert("temperature_range".to_string(), SpecValue::from("-20°C to 120°C"));

    match category {
        "Drive Chain" => {
            let strands = rng.gen_range(1..=3) as f64;
            specifications.insert("strands".to_string(), SpecValue::Number(strands));
            specifications.insert(
                "tensile_strength_kn".to_string(),
                SpecValue::Number(rng.gen_range(50.0..150.0)),
            );
        }
        "Sprocket" => {
            let teeth = rng.gen_range(10..50) as f64;
            specifications.insert("tooth_count".to_string(), SpecValue::Number(teeth));
            specifications.insert(
                "hub_type".to_string(),
                SpecValue::from(HUB_TYPES[rng.gen_range(0..HUB_TYPES.len())]),
            );
        }
        _ => {}
    }

    Product {
        id: format!("TSK_{:04}", cat_index * 1000 + i + 1),
        category: category.to_string(),
        series: Some(series.to_string()),
        model: format!("{}{}-{}", prefix, i + 1, rng.gen_range(0..100)),
        name: format!("{} {} Model {}", category, series, i + 1),
        specifications,
        features: vec![
            "High quality".to_string(),
            "Durable".to_string(),
            "Precision machined".to_string(),
        ],
        applications: vec![
            "Industrial".to_string(),
            "Manufacturing".to_string(),
            "Automation".to_string(),
        ],
        tsubaki_code: format!("TSK-{}-{}", prefix, i + 1),
    }
}

#[async_trait]
impl ProductSource for SyntheticProductSource {
    fn origin(&self) -> DataOrigin {
        DataOrigin::Synthetic
    }

    async fn fetch(&self) -> Result<Vec<Product>> {
        Ok(self.generate())
    }
}

/// Races the primary source against `deadline`. A timeout or any error yields the
/// fallback's products instead; a late primary result is dropped with its future.
pub async fn load_with_deadline(
    primary: &dyn ProductSource,
    fallback: &dyn ProductSource,
    deadline: Duration,
) -> Result<LoadOutcome> {
    let started = Instant::now();

    let failure = match tokio::time::timeout(deadline, primary.fetch()).await {
        Ok(Ok(products)) => {
            info!(
                source = %primary.origin(),
                count = products.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Loaded products"
            );
            return Ok(LoadOutcome {
                products,
                origin: primary.origin(),
                elapsed: started.elapsed(),
            });
        }
        Ok(Err(e)) => e,
        Err(_) => CatalogError::SourceTimeout {
            duration_ms: deadline.as_millis() as u64,
        }
        .into(),
    };

    warn!(
        source = %primary.origin(),
        fallback = %fallback.origin(),
        error = %failure,
        "Product source unavailable, using fallback data"
    );

    let products = fallback
        .fetch()
        .await
        .with_context(|| format!("Fallback source '{}' failed", fallback.origin()))?;
    info!(source = %fallback.origin(), count = products.len(), "Loaded fallback products");

    Ok(LoadOutcome {
        products,
        origin: fallback.origin(),
        elapsed: started.elapsed(),
    })
}
