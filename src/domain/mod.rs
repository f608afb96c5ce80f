pub mod app_settings;
pub mod calculator;
pub mod filter;
pub mod pagination;
pub mod product;
pub mod user;
