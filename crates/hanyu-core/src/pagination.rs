//! Fitting a variable number of translation items into popup pages.
//!
//! The popup renders one representative item, measures it, and asks
//! [`layout`] how many items fit. [`Paginator`] then owns the items and the
//! current page for the lifetime of one popup.

use hanyu_config::popup::PopupConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub min_items_per_page: usize,
    pub rows_per_page: usize,
    /// Inter-item gap added to the measured item width
    pub item_gap: f64,
    /// Horizontal padding subtracted from the container width
    pub container_padding: f64,
}

impl LayoutParams {
    pub fn from_config(config: &PopupConfig) -> Self {
        Self {
            min_items_per_page: config.min_items_per_page.max(1),
            rows_per_page: config.rows_per_page.max(1),
            item_gap: config.item_gap,
            container_padding: config.container_padding,
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::from_config(&PopupConfig::default())
    }
}

fn measurable(width: Option<f64>) -> Option<f64> {
    width.filter(|w| w.is_finite() && *w > 0.0)
}

/// Items per row for a container, never below the configured minimum
pub fn items_per_row(container_width: Option<f64>, item_width: Option<f64>, params: &LayoutParams) -> usize {
    let (Some(container), Some(item)) = (measurable(container_width), measurable(item_width)) else {
        return params.min_items_per_page;
    };

    let usable = (container - params.container_padding).max(0.0);
    let fitted = (usable / (item + params.item_gap)).floor() as usize;
    fitted.max(params.min_items_per_page)
}

/// Items per page for `item_count` items.
///
/// Falls back to the minimum when either width is not measurable yet. The
/// result never drops below the minimum, so short lists stay on one page.
pub fn layout(
    item_count: usize,
    container_width: Option<f64>,
    item_width: Option<f64>,
    params: &LayoutParams,
) -> usize {
    if measurable(container_width).is_none() || measurable(item_width).is_none() {
        return params.min_items_per_page;
    }

    let per_row = items_per_row(container_width, item_width, params);
    (per_row * params.rows_per_page)
        .min(item_count)
        .max(params.min_items_per_page)
}

/// Total pages; an empty list still occupies one (empty) page
pub fn total_pages(item_count: usize, items_per_page: usize) -> usize {
    item_count.div_ceil(items_per_page.max(1)).max(1)
}

/// Slice of `items` shown on `page_index`, empty when out of range
pub fn page<T>(items: &[T], page_index: usize, items_per_page: usize) -> &[T] {
    let per_page = items_per_page.max(1);
    let Some(start) = page_index.checked_mul(per_page) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = (start + per_page).min(items.len());
    &items[start..end]
}

/// Button state derived after every navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub visible: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub label: String,
}

/// Pagination state of one open popup
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Vec<T>,
    items_per_page: usize,
    current: usize,
}

impl<T> Paginator<T> {
    pub fn new(items: Vec<T>, items_per_page: usize) -> Self {
        Self {
            items,
            items_per_page: items_per_page.max(1),
            current: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Change the page size, keeping the first visible item on screen
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        let first = self.current * self.items_per_page;
        self.items_per_page = items_per_page.max(1);
        self.current = (first / self.items_per_page).min(self.total_pages() - 1);
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.items.len(), self.items_per_page)
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    /// Index into [`Self::items`] of the first item on the current page
    pub fn page_offset(&self) -> usize {
        self.current * self.items_per_page
    }

    pub fn page_items(&self) -> &[T] {
        page(&self.items, self.current, self.items_per_page)
    }

    pub fn has_prev(&self) -> bool {
        self.current > 0
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.total_pages()
    }

    /// Advance one page; no-op on the last page
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Go back one page; no-op on the first page
    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn controls(&self) -> PageControls {
        let total = self.total_pages();
        PageControls {
            visible: total > 1,
            prev_enabled: self.has_prev(),
            next_enabled: self.has_next(),
            label: format!("Page {} of {}", self.current + 1, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LayoutParams {
        LayoutParams {
            min_items_per_page: 3,
            rows_per_page: 2,
            item_gap: 15.0,
            container_padding: 40.0,
        }
    }

    #[test]
    fn ten_items_four_per_page() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(page(&items, 0, 4), &[0, 1, 2, 3]);
        assert_eq!(page(&items, 1, 4), &[4, 5, 6, 7]);
        assert_eq!(page(&items, 2, 4), &[8, 9]);
        assert!(page(&items, 3, 4).is_empty());
        assert_eq!(total_pages(items.len(), 4), 3);
    }

    #[test]
    fn navigation_past_boundaries_is_a_noop() {
        let mut pager = Paginator::new((0..10).collect::<Vec<u32>>(), 4);
        assert!(!pager.prev());
        assert_eq!(pager.current_page(), 0);

        assert!(pager.next());
        assert!(pager.next());
        assert_eq!(pager.current_page(), 2);
        assert_eq!(pager.page_items(), &[8, 9]);

        assert!(!pager.next());
        assert_eq!(pager.current_page(), 2);

        let controls = pager.controls();
        assert!(controls.visible);
        assert!(controls.prev_enabled);
        assert!(!controls.next_enabled);
        assert_eq!(controls.label, "Page 3 of 3");
    }

    #[test]
    fn layout_fills_two_rows() {
        // (760 - 40) / (75 + 15) = 8 per row
        assert_eq!(layout(40, Some(760.0), Some(75.0), &params()), 16);
        // capped by the item count
        assert_eq!(layout(5, Some(760.0), Some(75.0), &params()), 5);
    }

    #[test]
    fn layout_never_goes_below_minimum() {
        // narrow container still gets the minimum per row
        assert_eq!(items_per_row(Some(100.0), Some(75.0), &params()), 3);
        assert_eq!(layout(40, Some(100.0), Some(75.0), &params()), 6);
        // fewer items than the minimum
        assert_eq!(layout(2, Some(760.0), Some(75.0), &params()), 3);
    }

    #[test]
    fn unmeasured_container_falls_back_to_minimum() {
        assert_eq!(layout(20, None, Some(75.0), &params()), 3);
        assert_eq!(layout(20, Some(0.0), Some(75.0), &params()), 3);
        assert_eq!(layout(20, Some(760.0), None, &params()), 3);
    }

    #[test]
    fn empty_list_is_one_hidden_page() {
        let pager: Paginator<u32> = Paginator::new(Vec::new(), layout(0, None, None, &params()));
        assert_eq!(pager.total_pages(), 1);
        assert!(pager.page_items().is_empty());
        assert!(!pager.controls().visible);
    }

    #[test]
    fn resizing_keeps_first_visible_item() {
        let mut pager = Paginator::new((0..12).collect::<Vec<u32>>(), 3);
        pager.next();
        pager.next();
        assert_eq!(pager.page_items()[0], 6);

        pager.set_items_per_page(4);
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.page_items(), &[4, 5, 6, 7]);
    }
}
