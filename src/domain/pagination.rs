pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Number of directly selectable pages on each side of the current one.
const WINDOW_RADIUS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub window: Vec<usize>,
}

impl<T> Page<T> {
    pub fn show_controls(&self) -> bool {
        self.total_pages > 1
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Slices `items` into the requested page, clipped to the available range.
pub fn get_page<T: Clone>(items: &[T], current_page: usize, page_size: usize) -> Page<T> {
    let total = total_pages(items.len(), page_size);
    let current_page = current_page.max(1);
    let start = (current_page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        current_page,
        total_pages: total,
        window: page_window(current_page, total),
    }
}

/// Current page ± 2, clipped to `[1, total_pages]`.
pub fn page_window(current_page: usize, total_pages: usize) -> Vec<usize> {
    if total_pages == 0 {
        return Vec::new();
    }
    let start = current_page.saturating_sub(WINDOW_RADIUS).max(1);
    let end = current_page.saturating_add(WINDOW_RADIUS).min(total_pages);
    (start..=end).collect()
}

/// Whether `page` is a valid navigation target.
pub fn in_range(page: usize, total_pages: usize) -> bool {
    page >= 1 && page <= total_pages
}
