// Client-side filtering, sorting, and paging over loaded lists.
// Views keep their items untouched and derive index lists from them.

use std::ops::Range;

/// Case-insensitive substring match. An empty term matches everything.
pub fn matches_term(haystack: &str, term: &str) -> bool {
    let term = term.trim();
    term.is_empty() || haystack.to_lowercase().contains(&term.to_lowercase())
}

/// Indices of the items that pass `keep`, in their original order.
pub fn filter_indices<T>(items: &[T], mut keep: impl FnMut(&T) -> bool) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| keep(item))
        .map(|(i, _)| i)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn arrow(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "↑",
            SortOrder::Descending => "↓",
        }
    }
}

/// Stable sort of `indices` by a key drawn from the referenced items.
pub fn sort_indices_by<T, K: Ord>(
    indices: &mut [usize],
    items: &[T],
    key: impl Fn(&T) -> K,
    order: SortOrder,
) {
    indices.sort_by(|a, b| {
        let ordering = key(&items[*a]).cmp(&key(&items[*b]));
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

/// Fixed-size client-side pages. `page` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// Page count; an empty list still has one (empty) page.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// Slice bounds of the current page, clamped to the list.
    pub fn range(&self, len: usize) -> Range<usize> {
        let page = self.page.min(self.total_pages(len) - 1);
        let start = (page * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.page + 1 < self.total_pages(len)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    /// Advance one page. Returns false at the last page.
    pub fn next(&mut self, len: usize) -> bool {
        if self.has_next(len) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns false at the first page.
    pub fn prev(&mut self) -> bool {
        if self.has_prev() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }
}
