use crate::domain::calculator::CalculatorError;
use thiserror::Error;
use tracing::{error, warn};

/// Error conditions of the catalog core. None of them is fatal to the process.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Product source '{source_name}' failed: {message}")]
    SourceFailed { source_name: String, message: String },

    #[error("Product source timed out after {duration_ms} ms")]
    SourceTimeout { duration_ms: u64 },

    #[error("Stored record '{key}' is malformed: {source}")]
    MalformedRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage operation failed: {operation}")]
    Storage {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid administrator credentials")]
    InvalidCredentials,

    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Calculation failed: {0}")]
    Calculator(#[from] CalculatorError),
}

/// Structured logging helpers
pub struct LogHelper;

impl LogHelper {
    pub fn log_error_with_context(context: &str, error: &anyhow::Error) {
        error!(
            context = %context,
            error = %error,
            error_chain = ?error.chain().map(|e| e.to_string()).collect::<Vec<_>>(),
            "Error occurred"
        );
    }

    pub fn log_recovered(context: &str, error: &anyhow::Error) {
        warn!(
            context = %context,
            error = %error,
            "Recovered from error"
        );
    }
}

const STORAGE_NOTICE: &str =
    "Saved data could not be updated. Your changes apply to this session only.";

/// User-friendly error messages
pub struct UserErrorFormatter;

impl UserErrorFormatter {
    pub fn format_for_ui(error: &anyhow::Error) -> String {
        if let Some(catalog_error) = error.downcast_ref::<CatalogError>() {
            return Self::format_catalog_error(catalog_error);
        }

        if let Some(calc_error) = error.downcast_ref::<CalculatorError>() {
            return Self::format_calculator_error(calc_error);
        }

        let error_str = error.to_string().to_lowercase();

        if error_str.contains("database") || error_str.contains("sqlite") {
            return STORAGE_NOTICE.to_string();
        }

        if error_str.contains("timed out") || error_str.contains("timeout") {
            return "The operation timed out. Please try again.".to_string();
        }

        "An unexpected error occurred. Please try again.".to_string()
    }

    pub fn format_catalog_error(error: &CatalogError) -> String {
        match error {
            CatalogError::SourceFailed { .. } | CatalogError::SourceTimeout { .. } => {
                "Live catalog data is unavailable; showing sample data.".to_string()
            }
            CatalogError::MalformedRecord { .. } => {
                "Some saved data was unreadable and has been reset.".to_string()
            }
            CatalogError::Storage { .. } => {
                STORAGE_NOTICE.to_string()
            }
            CatalogError::InvalidCredentials => "Invalid administrator credentials.".to_string(),
            CatalogError::Validation { field, reason } => format!("Invalid {}: {}", field, reason),
            CatalogError::Calculator(e) => Self::format_calculator_error(e),
        }
    }

    fn format_calculator_error(error: &CalculatorError) -> String {
        match error {
            CalculatorError::NotANumber(_) => "Please enter all values as numbers.".to_string(),
            CalculatorError::DivisionByZero => "Cannot divide by zero.".to_string(),
            other => format!("Invalid expression: {}", other),
        }
    }
}
