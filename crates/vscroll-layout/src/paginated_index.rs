//! Paginated interval index.
//!
//! Containers record each child's extent along their stacking axis here so a
//! viewport query only touches the pages it overlaps instead of every child.
//! A uniform `offset` lets a container translate without rebuilding.

use crate::collections::map::HashMap;
use crate::LayoutError;

/// Default bucket width along the indexed axis.
pub const DEFAULT_PAGE_SIZE: f32 = 1000.0;

#[derive(Clone, Copy, Debug)]
struct Entry<T> {
    first_page: i64,
    start: f32,
    end: f32,
    value: T,
}

/// Bucketed list of `(value, start, end)` entries.
#[derive(Clone, Debug)]
pub struct PaginatedIndex<T> {
    page_size: f32,
    offset: f32,
    pages: HashMap<i64, Vec<Entry<T>>>,
    page_range: Option<(i64, i64)>,
    len: usize,
}

impl<T: Copy> PaginatedIndex<T> {
    /// Creates an empty index. Non-positive or non-finite page sizes fall back
    /// to [`DEFAULT_PAGE_SIZE`].
    pub fn new(page_size: f32) -> Self {
        let page_size = if page_size.is_finite() && page_size > 0.0 {
            page_size
        } else {
            log::warn!(
                "PaginatedIndex: page size {} is unusable, using {}",
                page_size,
                DEFAULT_PAGE_SIZE
            );
            DEFAULT_PAGE_SIZE
        };
        Self {
            page_size,
            offset: 0.0,
            pages: HashMap::default(),
            page_range: None,
            len: 0,
        }
    }

    #[inline]
    pub fn page_size(&self) -> f32 {
        self.page_size
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Number of entries added since the last [`clear`](Self::clear).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.page_range = None;
        self.offset = 0.0;
        self.len = 0;
    }

    /// Shifts every stored interval by `delta` without touching the pages.
    #[inline]
    pub fn translate(&mut self, delta: f32) {
        self.offset += delta;
    }

    fn start_page(&self, value: f32) -> i64 {
        (value / self.page_size).floor() as i64
    }

    fn end_page(&self, value: f32) -> i64 {
        (value / self.page_size).ceil() as i64
    }

    /// Records `value` as covering `[start, end]` in the current frame of
    /// reference (the offset is subtracted before bucketing).
    pub fn add(&mut self, value: T, start: f32, end: f32) -> Result<(), LayoutError> {
        if !start.is_finite() || !end.is_finite() || start > end {
            return Err(LayoutError::InvalidInterval { start, end });
        }
        let start = start - self.offset;
        let end = end - self.offset;
        let first_page = self.start_page(start);
        let last_page = self.end_page(end);
        let entry = Entry {
            first_page,
            start,
            end,
            value,
        };
        for page in first_page..=last_page {
            self.pages.entry(page).or_default().push(entry);
        }
        self.page_range = Some(match self.page_range {
            Some((low, high)) => (low.min(first_page), high.max(last_page)),
            None => (first_page, last_page),
        });
        self.len += 1;
        Ok(())
    }

    /// Visits every value whose interval intersects `[start, end]` (edges
    /// inclusive), once each, in page order. An empty or inverted range visits
    /// nothing.
    pub fn query(&self, start: f32, end: f32, mut visitor: impl FnMut(T)) {
        let Some((low, high)) = self.page_range else {
            return;
        };
        if start.is_nan() || end.is_nan() || start > end {
            return;
        }
        let start = start - self.offset;
        let end = end - self.offset;
        let first_page = self.start_page(start);
        let last_page = self.end_page(end).min(high);
        for page in first_page.max(low)..=last_page {
            let Some(entries) = self.pages.get(&page) else {
                continue;
            };
            for entry in entries {
                // Multi-page entries are reported from their own first page,
                // or from the query's first page when they begin before it.
                if page != first_page && entry.first_page != page {
                    continue;
                }
                if entry.start <= end && entry.end >= start {
                    visitor(entry.value);
                }
            }
        }
    }

    /// Collects the results of [`query`](Self::query) into a vector.
    pub fn query_vec(&self, start: f32, end: f32) -> Vec<T> {
        let mut out = Vec::new();
        self.query(start, end, |value| out.push(value));
        out
    }
}

impl<T: Copy> Default for PaginatedIndex<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_multi_page_entries_once() {
        let mut index = PaginatedIndex::new(100.0);
        index.add(1, 0.0, 350.0).unwrap();
        index.add(2, 120.0, 130.0).unwrap();
        index.add(3, 290.0, 420.0).unwrap();

        assert_eq!(index.query_vec(0.0, 1000.0), vec![1, 2, 3]);
        assert_eq!(index.query_vec(150.0, 250.0), vec![1]);
        assert_eq!(index.query_vec(125.0, 300.0), vec![1, 2, 3]);
        assert_eq!(index.query_vec(400.0, 500.0), vec![3]);
    }

    #[test]
    fn query_filters_candidates_sharing_a_page() {
        let mut index = PaginatedIndex::new(1000.0);
        index.add("a", 0.0, 50.0).unwrap();
        index.add("b", 60.0, 120.0).unwrap();
        index.add("c", 800.0, 900.0).unwrap();

        assert_eq!(index.query_vec(55.0, 58.0), Vec::<&str>::new());
        assert_eq!(index.query_vec(50.0, 60.0), vec!["a", "b"]);
        assert_eq!(index.query_vec(130.0, 700.0), Vec::<&str>::new());
    }

    #[test]
    fn offset_rebases_queries_without_rebuilding() {
        let mut index = PaginatedIndex::new(100.0);
        index.add(7, 0.0, 50.0).unwrap();
        index.translate(500.0);

        assert_eq!(index.offset(), 500.0);
        assert!(index.query_vec(0.0, 50.0).is_empty());
        assert_eq!(index.query_vec(520.0, 530.0), vec![7]);

        index.add(8, 560.0, 600.0).unwrap();
        assert_eq!(index.query_vec(500.0, 600.0), vec![7, 8]);
    }

    #[test]
    fn negative_positions_are_bucketed() {
        let mut index = PaginatedIndex::new(100.0);
        index.add(1, -250.0, -120.0).unwrap();
        index.add(2, -10.0, 10.0).unwrap();

        assert_eq!(index.query_vec(-130.0, -125.0), vec![1]);
        assert_eq!(index.query_vec(-5.0, 0.0), vec![2]);
        assert_eq!(index.query_vec(-300.0, 300.0), vec![1, 2]);
    }

    #[test]
    fn rejects_invalid_intervals() {
        let mut index = PaginatedIndex::new(100.0);
        assert!(matches!(
            index.add(1, 10.0, 5.0),
            Err(LayoutError::InvalidInterval { .. })
        ));
        assert!(index.add(1, f32::NAN, 5.0).is_err());
        assert!(index.add(1, 0.0, f32::INFINITY).is_err());
        assert!(index.is_empty());
    }

    #[test]
    fn inverted_query_visits_nothing() {
        let mut index = PaginatedIndex::new(100.0);
        index.add(1, 0.0, 100.0).unwrap();
        assert!(index.query_vec(50.0, 10.0).is_empty());
        assert!(index.query_vec(f32::NAN, 10.0).is_empty());
    }

    #[test]
    fn unusable_page_size_falls_back() {
        let index: PaginatedIndex<u32> = PaginatedIndex::new(0.0);
        assert_eq!(index.page_size(), DEFAULT_PAGE_SIZE);
    }
}
