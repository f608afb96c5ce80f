use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const PITCH_KEY: &str = "pitch_mm";
pub const MATERIAL_KEY: &str = "material";

/// A single catalog entry. Immutable once loaded into the catalog store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub series: Option<String>,
    pub model: String,
    pub name: String,
    #[serde(default)]
    pub specifications: BTreeMap<String, SpecValue>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub applications: Vec<String>,
    pub tsubaki_code: String,
}

/// Specification values arrive either as numbers or as free text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SpecValue {
    Number(f64),
    Text(String),
}

impl SpecValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SpecValue::Number(n) => Some(*n),
            SpecValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SpecValue::Text(s) => Some(s),
            SpecValue::Number(_) => None,
        }
    }
}

impl fmt::Display for SpecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecValue::Number(n) => write!(f, "{}", n),
            SpecValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for SpecValue {
    fn from(value: f64) -> Self {
        SpecValue::Number(value)
    }
}

impl From<&str> for SpecValue {
    fn from(value: &str) -> Self {
        SpecValue::Text(value.to_string())
    }
}

impl Product {
    pub fn pitch_mm(&self) -> Option<f64> {
        self.specifications.get(PITCH_KEY).and_then(SpecValue::as_number)
    }

    pub fn material(&self) -> Option<&str> {
        self.specifications.get(MATERIAL_KEY).and_then(SpecValue::as_text)
    }

    /// Lower-cased fields that free-text search looks at.
    pub fn searchable_fields(&self) -> [String; 4] {
        [
            self.name.to_lowercase(),
            self.model.to_lowercase(),
            self.tsubaki_code.to_lowercase(),
            self.category.to_lowercase(),
        ]
    }
}

/// Human readable label for a specification key, falling back to the key itself.
pub fn spec_label(key: &str) -> &str {
    match key {
        "pitch_mm" => "Pitch (mm)",
        "pitch_inch" => "Pitch (inch)",
        "strands" => "Strands",
        "tensile_strength_kn" => "Tensile strength (kN)",
        "allowable_load_kn" => "Allowable load (kN)",
        "weight_kg_per_m" => "Weight (kg/m)",
        "material" => "Material",
        "temperature_range" => "Temperature range",
        "compatible_chain" => "Compatible chain",
        "tooth_count" => "Tooth count",
        "pitch_diameter_mm" => "Pitch diameter (mm)",
        "outside_diameter_mm" => "Outside diameter (mm)",
        "hub_type" => "Hub type",
        "hardness" => "Hardness",
        "lubrication" => "Lubrication",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_missing_optional_fields() {
        let json = r#"{
            "id": "P1",
            "category": "Drive Chain",
            "model": "RS40",
            "name": "RS40 Roller Chain",
            "tsubaki_code": "RS40-1"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.series, None);
        assert!(product.specifications.is_empty());
        assert!(product.features.is_empty());
        assert_eq!(product.pitch_mm(), None);
    }

    #[test]
    fn test_mixed_specification_values() {
        let json = r#"{
            "id": "P2",
            "category": "Sprocket",
            "series": "RS Standard",
            "model": "SP40",
            "name": "Sprocket 40",
            "specifications": { "pitch_mm": 12.7, "material": "Carbon Steel", "hub_type": "B" },
            "tsubaki_code": "SP-40"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.pitch_mm(), Some(12.7));
        assert_eq!(product.material(), Some("Carbon Steel"));
        assert_eq!(product.specifications["hub_type"].to_string(), "B");
    }

    #[test]
    fn test_spec_label_fallback() {
        assert_eq!(spec_label("tooth_count"), "Tooth count");
        assert_eq!(spec_label("custom_key"), "custom_key");
    }
}
