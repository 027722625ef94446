//! Pagination over the filtered subset.

use std::ops::Range;

use serde::Serialize;

use crate::error::EngineError;

/// Page numbers shown at most in the pagination control.
pub const WINDOW_SIZE: usize = 5;

/// One page of a list: 1-based number, size and the totals it came from.
///
/// Only built through [`Page::first`], so `number >= 1` and `size >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    number: usize,
    size: usize,
    total_items: usize,
    total_pages: usize,
}

impl Page {
    /// The first page of `total_items` items split into pages of `size`.
    pub fn first(total_items: usize, size: usize) -> Result<Self, EngineError> {
        if size == 0 {
            return Err(EngineError::InvalidPageSize);
        }
        Ok(Page {
            number: 1,
            size,
            total_items,
            total_pages: total_items.div_ceil(size),
        })
    }

    /// Page 1 of a new total, keeping the page size.
    pub fn restart(self, total_items: usize) -> Self {
        Page {
            number: 1,
            size: self.size,
            total_items,
            total_pages: total_items.div_ceil(self.size),
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Move to page `number`, clamped to `[1, total_pages]`.
    pub fn goto(self, number: usize) -> Self {
        let number = number.clamp(1, self.total_pages.max(1));
        Page { number, ..self }
    }

    pub fn next(self) -> Self {
        self.goto(self.number + 1)
    }

    pub fn prev(self) -> Self {
        self.goto(self.number.saturating_sub(1))
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    /// Index range of this page's items in the filtered list.
    pub fn range(&self) -> Range<usize> {
        let start = (self.number.saturating_sub(1) * self.size).min(self.total_items);
        let end = (start + self.size).min(self.total_items);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        let end = range.end.min(items.len());
        &items[range.start.min(end)..end]
    }

    /// Page numbers to offer, centred on the current page where possible.
    /// Empty when there is nothing to page through.
    pub fn window(&self) -> Vec<usize> {
        if self.total_pages <= 1 {
            return Vec::new();
        }
        let span = WINDOW_SIZE - 1;
        let mut start = self.number.saturating_sub(2).max(1);
        let end = (start + span).min(self.total_pages);
        if end - start < span {
            start = end.saturating_sub(span).max(1);
        }
        (start..=end).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_round_up() {
        let page = Page::first(11, 5).unwrap();
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.range(), 0..5);
        assert_eq!(page.goto(3).range(), 10..11);
    }

    #[test]
    fn zero_size_rejected() {
        assert_eq!(Page::first(3, 0).unwrap_err(), EngineError::InvalidPageSize);
    }

    #[test]
    fn navigation_clamps() {
        let page = Page::first(11, 5).unwrap();
        assert_eq!(page.prev().number(), 1);
        assert_eq!(page.goto(99).number(), 3);
        assert_eq!(page.goto(0).number(), 1);
        assert_eq!(page.goto(3).next().number(), 3);
        assert!(page.has_next());
        assert!(!page.has_prev());
    }

    #[test]
    fn window_slides_with_current_page() {
        let page = Page::first(50, 5).unwrap();
        assert_eq!(page.window(), vec![1, 2, 3, 4, 5]);
        assert_eq!(page.goto(6).window(), vec![4, 5, 6, 7, 8]);
        assert_eq!(page.goto(10).window(), vec![6, 7, 8, 9, 10]);
        assert_eq!(page.goto(9).window(), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn short_lists_show_every_page() {
        let page = Page::first(12, 5).unwrap();
        assert_eq!(page.goto(3).window(), vec![1, 2, 3]);
    }

    #[test]
    fn no_window_for_single_or_empty_page() {
        assert!(Page::first(5, 5).unwrap().window().is_empty());
        let empty = Page::first(0, 5).unwrap();
        assert!(empty.window().is_empty());
        assert_eq!(empty.range(), 0..0);
        assert_eq!(empty.next().number(), 1);
    }

    #[test]
    fn restart_returns_to_first_page() {
        let page = Page::first(50, 5).unwrap().goto(7).restart(12);
        assert_eq!(page.number(), 1);
        assert_eq!(page.size(), 5);
        assert_eq!(page.total_items(), 12);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.range(), 0..5);
        assert_eq!(page.restart(0).range(), 0..0);
    }

    #[test]
    fn slice_takes_page_items() {
        let items: Vec<u32> = (0..7).collect();
        let page = Page::first(items.len(), 3).unwrap().goto(3);
        assert_eq!(page.slice(&items), &[6]);
    }
}
