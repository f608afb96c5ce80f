pub mod auth_service;
pub mod catalog_service;
pub mod data_source;
pub mod error_handling;
pub mod export_service;
pub mod profile_service;

pub use auth_service::AuthService;
pub use catalog_service::CatalogStore;
pub use export_service::ExportService;
pub use profile_service::UserProfileStore;
