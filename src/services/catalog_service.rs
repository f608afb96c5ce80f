use crate::config::CategoryTarget;
use crate::domain::filter::{
    self, FilterCriteria, FilterField, FilterOptions, apply_filters, normalize_query,
    search_products,
};
use crate::domain::pagination::{self, DEFAULT_PAGE_SIZE, Page};
use crate::domain::product::Product;
use tracing::debug;

/// Category card for the home overview.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
    pub description: String,
}

/// Holds the full product list, the filtered subset, and the page cursor.
///
/// `filtered` is always a subsequence of `all`. Every operation that recomputes
/// it moves the cursor back to page 1; page navigation never touches it.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    all: Vec<Product>,
    filtered: Vec<Product>,
    criteria: FilterCriteria,
    current_page: usize,
    page_size: usize,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl CatalogStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            all: Vec::new(),
            filtered: Vec::new(),
            criteria: FilterCriteria::default(),
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Replaces the catalog wholesale and clears any filter state.
    pub fn load(&mut self, products: Vec<Product>) {
        self.filtered = products.clone();
        self.all = products;
        self.criteria = FilterCriteria::default();
        self.current_page = 1;
        debug!(count = self.all.len(), "Catalog loaded");
    }

    pub fn all(&self) -> &[Product] {
        &self.all
    }

    pub fn filtered(&self) -> &[Product] {
        &self.filtered
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn find(&self, product_id: &str) -> Option<&Product> {
        self.all.iter().find(|p| p.id == product_id)
    }

    pub fn set_filter(&mut self, field: FilterField) {
        self.criteria.set(field);
        self.apply_filters();
    }

    pub fn filter_by_category(&mut self, category: &str) {
        self.set_filter(FilterField::Category(Some(category.to_string())));
    }

    /// Recomputes `filtered` from `all` using the structured criteria.
    /// Any previous free-text result is discarded.
    pub fn apply_filters(&mut self) {
        self.criteria.free_text = None;
        self.filtered = apply_filters(&self.all, &self.criteria);
        self.current_page = 1;
        debug!(
            criteria = ?self.criteria,
            matched = self.filtered.len(),
            "Applied structured filters"
        );
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear_structured();
        self.criteria.free_text = None;
        self.filtered = self.all.clone();
        self.current_page = 1;
    }

    /// Free-text search over the whole catalog. Replaces `filtered` wholesale.
    /// Returns the normalized query, or `None` when the input was blank.
    pub fn search(&mut self, query: &str) -> Option<String> {
        let q = normalize_query(query)?;
        self.filtered = search_products(&self.all, &q);
        self.criteria.free_text = Some(q.clone());
        self.current_page = 1;
        debug!(query = %q, matched = self.filtered.len(), "Search completed");
        Some(q)
    }

    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.filtered.len(), self.page_size)
    }

    pub fn page(&self) -> Page<Product> {
        pagination::get_page(&self.filtered, self.current_page, self.page_size)
    }

    /// Moves to `page` if it is within `[1, total_pages]`; otherwise does nothing.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if pagination::in_range(page, self.total_pages()) {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        match self.current_page.checked_sub(1) {
            Some(page) => self.go_to_page(page),
            None => false,
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page + 1)
    }

    pub fn filter_options(&self) -> FilterOptions {
        filter::filter_options(&self.all)
    }

    pub fn category_summaries(targets: &[CategoryTarget]) -> Vec<CategorySummary> {
        targets
            .iter()
            .map(|t| CategorySummary {
                name: t.name.clone(),
                count: t.target,
                description: if t.description.is_empty() {
                    "High quality industrial product".to_string()
                } else {
                    t.description.clone()
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::app_config::default_categories;
    use crate::services::data_source::SyntheticProductSource;

    fn store() -> CatalogStore {
        let mut store = CatalogStore::default();
        store.load(SyntheticProductSource::new(default_categories(), 100, Some(1)).generate());
        store
    }

    #[test]
    fn test_load_resets_state() {
        let mut store = store();
        store.filter_by_category("Sprocket");
        store.next_page();

        store.load(store.all().to_vec());
        assert_eq!(store.filtered().len(), 287);
        assert_eq!(store.current_page(), 1);
        assert!(store.criteria().is_unconstrained());
    }

    #[test]
    fn test_filter_resets_page() {
        let mut store = store();
        assert!(store.go_to_page(3));
        assert_eq!(store.current_page(), 3);

        store.filter_by_category("Sprocket");
        assert_eq!(store.current_page(), 1);
        assert_eq!(store.filtered().len(), 100);
        assert!(store.filtered().iter().all(|p| p.category == "Sprocket"));
    }

    #[test]
    fn test_navigation_is_bounded() {
        let mut store = store();
        assert_eq!(store.total_pages(), 15);

        assert!(!store.previous_page());
        assert!(!store.go_to_page(0));
        assert!(!store.go_to_page(16));
        assert!(store.go_to_page(15));
        assert!(!store.next_page());
        assert_eq!(store.page().items.len(), 7);
        assert!(store.previous_page());
        assert_eq!(store.current_page(), 14);
    }

    #[test]
    fn test_search_replaces_structured_result() {
        let mut store = store();
        store.filter_by_category("Sprocket");

        let q = store.search("  TSK-DR-1 ").unwrap();
        assert_eq!(q, "tsk-dr-1");
        // TSK-DR-1 and TSK-DR-10 through TSK-DR-19
        assert!(store.filtered().iter().all(|p| p.category == "Drive Chain"));
        assert_eq!(store.filtered().len(), 11);
        assert_eq!(store.criteria().free_text.as_deref(), Some("tsk-dr-1"));

        assert!(store.search("   ").is_none());
        assert_eq!(store.filtered().len(), 11);
    }

    #[test]
    fn test_clear_filters_restores_all() {
        let mut store = store();
        store.set_filter(FilterField::Material(Some("Nickel Plated".to_string())));
        store.search("coupling");
        store.clear_filters();

        assert_eq!(store.filtered(), store.all());
        assert!(store.criteria().is_unconstrained());
        assert!(store.criteria().free_text.is_none());
    }

    #[test]
    fn test_find_and_summaries() {
        let store = store();
        assert_eq!(store.find("TSK_1001").unwrap().category, "Sprocket");
        assert!(store.find("missing").is_none());

        let summaries = CatalogStore::category_summaries(&default_categories());
        assert_eq!(summaries[1].name, "Sprocket");
        assert_eq!(summaries[1].count, 11953);
    }
}
