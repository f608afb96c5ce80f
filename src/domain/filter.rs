use crate::domain::product::Product;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Active structured constraints. `None` means the field is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub category: Option<String>,
    pub series: Option<String>,
    pub pitch_mm: Option<f64>,
    pub material: Option<String>,
    pub free_text: Option<String>,
}

/// A single structured filter change coming from the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterField {
    Category(Option<String>),
    Series(Option<String>),
    Pitch(Option<f64>),
    Material(Option<String>),
}

impl FilterCriteria {
    pub fn set(&mut self, field: FilterField) {
        match field {
            FilterField::Category(value) => self.category = non_empty(value),
            FilterField::Series(value) => self.series = non_empty(value),
            FilterField::Pitch(value) => self.pitch_mm = value,
            FilterField::Material(value) => self.material = non_empty(value),
        }
    }

    /// Resets the structured fields. Free text is left alone.
    pub fn clear_structured(&mut self) {
        self.category = None;
        self.series = None;
        self.pitch_mm = None;
        self.material = None;
    }

    pub fn is_unconstrained(&self) -> bool {
        self.category.is_none()
            && self.series.is_none()
            && self.pitch_mm.is_none()
            && self.material.is_none()
    }

    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| product.category == c);
        let series_ok = self
            .series
            .as_deref()
            .map_or(true, |s| product.series.as_deref() == Some(s));
        let pitch_ok = self
            .pitch_mm
            .map_or(true, |p| product.pitch_mm() == Some(p));
        let material_ok = self
            .material
            .as_deref()
            .map_or(true, |m| product.material() == Some(m));

        category_ok && series_ok && pitch_ok && material_ok
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Structured filtering. The result keeps the relative order of `products`.
pub fn apply_filters(products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
    products
        .iter()
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect()
}

/// Normalizes a raw search box value. Returns `None` for blank input.
pub fn normalize_query(query: &str) -> Option<String> {
    let q = query.trim().to_lowercase();
    if q.is_empty() { None } else { Some(q) }
}

/// Free-text search over name, model, vendor code and category.
/// `query` must already be normalized.
pub fn search_products(products: &[Product], query: &str) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.searchable_fields().iter().any(|f| f.contains(query)))
        .cloned()
        .collect()
}

/// Distinct values present in the catalog, used to populate filter selectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub series: Vec<String>,
    pub pitches: Vec<f64>,
    pub materials: Vec<String>,
}

pub fn filter_options(products: &[Product]) -> FilterOptions {
    let mut options = FilterOptions::default();
    let mut pitches = BTreeSet::new();

    for product in products {
        push_unique(&mut options.categories, &product.category);
        if let Some(series) = product.series.as_deref().filter(|s| !s.is_empty()) {
            push_unique(&mut options.series, series);
        }
        if let Some(pitch) = product.pitch_mm() {
            pitches.insert(OrderedFloat(pitch));
        }
        if let Some(material) = product.material().filter(|m| !m.is_empty()) {
            push_unique(&mut options.materials, material);
        }
    }

    options.pitches = pitches.into_iter().map(|p| p.into_inner()).collect();
    options
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::SpecValue;
    use std::collections::BTreeMap;

    fn product(
        id: &str,
        category: &str,
        series: Option<&str>,
        pitch: Option<f64>,
        material: Option<&str>,
    ) -> Product {
        let mut specifications = BTreeMap::new();
        if let Some(p) = pitch {
            specifications.insert("pitch_mm".to_string(), SpecValue::Number(p));
        }
        if let Some(m) = material {
            specifications.insert("material".to_string(), SpecValue::Text(m.to_string()));
        }
        Product {
            id: id.to_string(),
            category: category.to_string(),
            series: series.map(str::to_string),
            model: format!("M-{}", id),
            name: format!("{} {}", category, id),
            specifications,
            features: vec![],
            applications: vec![],
            tsubaki_code: format!("TSK-{}", id),
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product("1", "Drive Chain", Some("LAMBDA"), Some(12.7), Some("Carbon Steel")),
            product("2", "Sprocket", Some("RS Standard"), Some(12.7), Some("Stainless Steel")),
            product("3", "Sprocket", None, None, None),
            product("4", "Coupling", Some("LAMBDA"), Some(25.4), Some("Carbon Steel")),
        ]
    }

    #[test]
    fn test_category_filter_keeps_order() {
        let products = vec![
            product("a", "Drive Chain", None, None, None),
            product("b", "Sprocket", None, None, None),
            product("c", "Sprocket", None, None, None),
        ];
        let criteria = FilterCriteria {
            category: Some("Sprocket".to_string()),
            ..Default::default()
        };

        let result = apply_filters(&products, &criteria);
        let ids: Vec<_> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_missing_fields_are_misses() {
        let mut criteria = FilterCriteria::default();
        criteria.set(FilterField::Pitch(Some(12.7)));
        let result = apply_filters(&sample(), &criteria);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|p| p.id != "3"));

        let mut criteria = FilterCriteria::default();
        criteria.set(FilterField::Series(Some("LAMBDA".to_string())));
        criteria.set(FilterField::Material(Some("Carbon Steel".to_string())));
        let ids: Vec<_> = apply_filters(&sample(), &criteria).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn test_blank_value_is_unconstrained() {
        let mut criteria = FilterCriteria::default();
        criteria.set(FilterField::Category(Some("  ".to_string())));
        assert!(criteria.is_unconstrained());
        assert_eq!(apply_filters(&sample(), &criteria).len(), 4);
    }

    #[test]
    fn test_filter_is_idempotent_subsequence() {
        let products = sample();
        let criteria = FilterCriteria {
            material: Some("Carbon Steel".to_string()),
            ..Default::default()
        };

        let once = apply_filters(&products, &criteria);
        let twice = apply_filters(&once, &criteria);
        assert_eq!(once, twice);

        let mut cursor = products.iter();
        for item in &once {
            assert!(cursor.any(|p| p == item), "result must be an ordered subsequence");
        }
    }

    #[test]
    fn test_search_matches_any_field_case_insensitively() {
        let products = sample();
        let q = normalize_query("  SPROCKET ").unwrap();
        assert_eq!(search_products(&products, &q).len(), 2);

        let q = normalize_query("tsk-4").unwrap();
        let result = search_products(&products, &q);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "4");

        assert!(normalize_query("   ").is_none());
    }

    #[test]
    fn test_filter_options() {
        let options = filter_options(&sample());
        assert_eq!(options.categories, vec!["Drive Chain", "Sprocket", "Coupling"]);
        assert_eq!(options.series, vec!["LAMBDA", "RS Standard"]);
        assert_eq!(options.pitches, vec![12.7, 25.4]);
        assert_eq!(options.materials, vec!["Carbon Steel", "Stainless Steel"]);
    }
}
