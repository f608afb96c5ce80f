use crate::domain::app_settings::{Section, Theme};
use crate::domain::calculator::CalcDisplay;
use crate::domain::product::Product;
use crate::services::data_source::DataOrigin;
use crate::services::{CatalogStore, UserProfileStore};

/// Everything the rendering layer reads.
/// Owned by [`AppController`](super::controller::AppController).
pub struct AppState {
    pub catalog: CatalogStore,
    pub profiles: UserProfileStore,
    pub section: Section,
    pub theme: Theme,
    pub calculator: CalcDisplay,
    pub selected_product: Option<String>,
    pub data_origin: Option<DataOrigin>,
    /// Inline feedback for the last intent (validation messages, rejections)
    pub notice: Option<String>,
}

impl AppState {
    pub fn new(catalog: CatalogStore, profiles: UserProfileStore) -> Self {
        Self {
            catalog,
            profiles,
            section: Section::default(),
            theme: Theme::default(),
            calculator: CalcDisplay::default(),
            selected_product: None,
            data_origin: None,
            notice: None,
        }
    }

    pub fn selected(&self) -> Option<&Product> {
        self.selected_product
            .as_deref()
            .and_then(|id| self.catalog.find(id))
    }

    pub fn is_logged_in(&self) -> bool {
        self.profiles.user().is_some()
    }
}
