//! Offset pagination.

use serde::Serialize;

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matches across all pages.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// 1-based position of the first item shown, 0 when the page is empty.
    pub fn first_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// 1-based position of the last item shown, 0 when the page is empty.
    pub fn last_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_index() + self.items.len() - 1
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Cut page `page` (1-based) out of `rows`. Page 0, a zero page size or a
/// page past the end all give an empty page.
pub fn paginate<T: Clone>(rows: &[T], page: usize, page_size: usize) -> Page<T> {
    let total = rows.len();
    let total_pages = if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    };

    let items = if page == 0 || page_size == 0 {
        Vec::new()
    } else {
        let start = (page - 1).saturating_mul(page_size);
        rows.iter().skip(start).take(page_size).cloned().collect()
    };

    Page {
        items,
        total,
        page,
        page_size,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_and_last_pages() {
        let rows: Vec<u32> = (1..=25).collect();

        let p = paginate(&rows, 2, 10);
        assert_eq!(p.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(p.total_pages, 3);
        assert_eq!((p.first_index(), p.last_index()), (11, 20));
        assert!(p.has_prev() && p.has_next());

        let p = paginate(&rows, 3, 10);
        assert_eq!(p.items, (21..=25).collect::<Vec<_>>());
        assert!(!p.has_next());
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let rows: Vec<u32> = (1..=5).collect();
        for (page, size) in [(0, 10), (2, 10), (1, 0), (usize::MAX, 10)] {
            let p = paginate(&rows, page, size);
            assert!(p.items.is_empty(), "page={page} size={size}");
            assert_eq!(p.total, 5);
            assert_eq!(p.first_index(), 0);
        }
    }

    #[test]
    fn empty_input() {
        let p = paginate::<u32>(&[], 1, 10);
        assert_eq!(p.total_pages, 0);
        assert!(p.items.is_empty());
    }
}
