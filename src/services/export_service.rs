use crate::domain::product::Product;
use anyhow::Result;
use csv::Writer;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const DEFAULT_EXPORT_FILE: &str = "tsubaki_products.csv";
pub const DEFAULT_JSON_EXPORT_FILE: &str = "tsubaki_products.json";

const CSV_HEADERS: [&str; 6] = ["ID", "Name", "Model", "Category", "Series", "Tsubaki Code"];

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct ExportedProduct {
    pub id: String,
    pub name: String,
    pub model: String,
    pub category: String,
    pub series: Option<String>,
    pub tsubaki_code: String,
}

impl From<&Product> for ExportedProduct {
    fn from(product: &Product) -> Self {
        ExportedProduct {
            id: product.id.clone(),
            name: product.name.clone(),
            model: product.model.clone(),
            category: product.category.clone(),
            series: product.series.clone(),
            tsubaki_code: product.tsubaki_code.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn default_file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => DEFAULT_EXPORT_FILE,
            ExportFormat::Json => DEFAULT_JSON_EXPORT_FILE,
        }
    }
}

pub struct ExportService;

impl ExportService {
    /// Export products to CSV format. Fields containing the delimiter,
    /// quotes or line breaks are quoted.
    pub fn export_to_csv(products: &[Product]) -> Result<String> {
        let mut wtr = Writer::from_writer(vec![]);

        wtr.write_record(CSV_HEADERS)?;

        for product in products {
            wtr.write_record([
                product.id.as_str(),
                product.name.as_str(),
                product.model.as_str(),
                product.category.as_str(),
                product.series.as_deref().unwrap_or_default(),
                product.tsubaki_code.as_str(),
            ])?;
        }

        let data = wtr.into_inner()?;
        Ok(String::from_utf8(data)?)
    }

    /// Export products to JSON format
    pub fn export_to_json(products: &[Product]) -> Result<String> {
        let exported: Vec<ExportedProduct> = products.iter().map(Into::into).collect();
        Ok(serde_json::to_string_pretty(&exported)?)
    }

    pub fn export(products: &[Product], format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Self::export_to_json(products),
            ExportFormat::Csv => Self::export_to_csv(products),
        }
    }

    /// Save export to file
    pub fn export_to_file(products: &[Product], format: ExportFormat, path: &Path) -> Result<()> {
        let content = Self::export(products, format)?;

        let mut file = std::fs::File::create(path)?;
        file.write_all(content.as_bytes())?;

        info!(
            path = %path.display(),
            count = products.len(),
            format = ?format,
            "Exported products"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn product(id: &str, name: &str, series: Option<&str>) -> Product {
        Product {
            id: id.to_string(),
            category: "Drive Chain".to_string(),
            series: series.map(str::to_string),
            model: "RS40-1".to_string(),
            name: name.to_string(),
            specifications: BTreeMap::new(),
            features: vec![],
            applications: vec![],
            tsubaki_code: "TSK-DR-1".to_string(),
        }
    }

    #[test]
    fn test_export_to_csv() {
        let csv = ExportService::export_to_csv(&[
            product("TSK_0001", "Drive Chain LAMBDA Model 1", Some("LAMBDA")),
            product("TSK_0002", "Chain, heavy duty", None),
        ])
        .unwrap();

        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "ID,Name,Model,Category,Series,Tsubaki Code");
        assert_eq!(
            lines[1],
            "TSK_0001,Drive Chain LAMBDA Model 1,RS40-1,Drive Chain,LAMBDA,TSK-DR-1"
        );
        assert_eq!(lines[2], "TSK_0002,\"Chain, heavy duty\",RS40-1,Drive Chain,,TSK-DR-1");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_empty_has_header_only() {
        let csv = ExportService::export_to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_csv_parses_back_with_six_columns() {
        let csv =
            ExportService::export_to_csv(&[product("X", "Quote \"inside\", comma", None)]).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.len(), 6);
        assert_eq!(&record[1], "Quote \"inside\", comma");
    }

    #[test]
    fn test_export_to_json_and_file() {
        let products = vec![product("TSK_0001", "Chain", Some("Super"))];
        let json = ExportService::export_to_json(&products).unwrap();
        let parsed: Vec<ExportedProduct> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0].series.as_deref(), Some("Super"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE);
        ExportService::export_to_file(&products, ExportFormat::Csv, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("ID,Name"));
    }
}
