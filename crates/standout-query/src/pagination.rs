//! Limit/offset pagination.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

type Clamp<Q> = Arc<dyn Fn(Q, usize) -> Q + Send + Sync>;

/// Applies LIMIT and OFFSET clauses to queries of type `Q`.
pub struct Config<Q> {
    limit: Clamp<Q>,
    offset: Clamp<Q>,
}

impl<Q> Config<Q> {
    /// Creates a config from the backend's limit and offset functions.
    pub fn new(
        limit: impl Fn(Q, usize) -> Q + Send + Sync + 'static,
        offset: impl Fn(Q, usize) -> Q + Send + Sync + 'static,
    ) -> Self {
        Config {
            limit: Arc::new(limit),
            offset: Arc::new(offset),
        }
    }
}

impl<Q> Clone for Config<Q> {
    fn clone(&self) -> Self {
        Config {
            limit: Arc::clone(&self.limit),
            offset: Arc::clone(&self.offset),
        }
    }
}

impl<Q> fmt::Debug for Config<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("pagination::Config").finish_non_exhaustive()
    }
}

/// Applies pagination to a query.
///
/// The offset is applied first, then the limit. Zero or negative values are
/// ignored, so `apply(q, cfg, 0, 0)` returns `q` untouched.
///
/// # Example
///
/// ```
/// use standout_query::pagination::{self, Config};
///
/// let cfg = Config::new(
///     |q: String, n| format!("{q} LIMIT {n}"),
///     |q: String, n| format!("{q} OFFSET {n}"),
/// );
///
/// let q = pagination::apply("SELECT *".to_string(), &cfg, 25, 50);
/// assert_eq!(q, "SELECT * OFFSET 50 LIMIT 25");
/// ```
pub fn apply<Q>(query: Q, cfg: &Config<Q>, limit: i64, offset: i64) -> Q {
    let mut query = query;
    if let Some(offset) = positive(offset) {
        query = (cfg.offset)(query, offset);
    }
    if let Some(limit) = positive(limit) {
        query = (cfg.limit)(query, limit);
    }
    query
}

fn positive(n: i64) -> Option<usize> {
    usize::try_from(n).ok().filter(|&n| n > 0)
}

/// One page of results with its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records on this page.
    pub data: Vec<T>,
    /// Total records across all pages.
    pub total: i64,
    /// Maximum records per page.
    pub limit: i64,
    /// Records skipped before this page.
    pub offset: i64,
}

impl<T> Page<T> {
    /// Creates a page.
    pub fn new(data: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Page {
            data,
            total,
            limit,
            offset,
        }
    }

    /// Returns `true` if more records follow this page.
    pub fn has_next_page(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total
    }

    /// Returns `true` if records precede this page.
    pub fn has_prev_page(&self) -> bool {
        self.offset > 0
    }

    /// Returns the 1-indexed page number.
    pub fn page_number(&self) -> i64 {
        if self.limit <= 0 {
            return 1;
        }
        (self.offset / self.limit).saturating_add(1)
    }

    /// Returns the total number of pages.
    pub fn total_pages(&self) -> i64 {
        if self.limit <= 0 {
            return 1;
        }
        self.total / self.limit + i64::from(self.total % self.limit > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config<Vec<String>> {
        Config::new(
            |mut q: Vec<String>, n| {
                q.push(format!("limit {n}"));
                q
            },
            |mut q: Vec<String>, n| {
                q.push(format!("offset {n}"));
                q
            },
        )
    }

    #[test]
    fn applies_offset_then_limit() {
        assert_eq!(apply(vec![], &cfg(), 10, 20), vec!["offset 20", "limit 10"]);
    }

    #[test]
    fn ignores_non_positive_values() {
        assert!(apply(vec![], &cfg(), 0, 0).is_empty());
        assert!(apply(vec![], &cfg(), -5, -1).is_empty());
        assert_eq!(apply(vec![], &cfg(), 10, 0), vec!["limit 10"]);
        assert_eq!(apply(vec![], &cfg(), -1, 5), vec!["offset 5"]);
    }

    #[test]
    fn page_navigation() {
        let first = Page::new(vec![1, 2], 5, 2, 0);
        assert!(first.has_next_page());
        assert!(!first.has_prev_page());
        assert_eq!(first.page_number(), 1);
        assert_eq!(first.total_pages(), 3);

        let last = Page::new(vec![5], 5, 2, 4);
        assert!(!last.has_next_page());
        assert!(last.has_prev_page());
        assert_eq!(last.page_number(), 3);
    }

    #[test]
    fn exact_multiple_has_no_extra_page() {
        assert_eq!(Page::<u8>::new(vec![], 10, 5, 0).total_pages(), 2);
        assert_eq!(Page::<u8>::new(vec![], 0, 5, 0).total_pages(), 0);
    }

    #[test]
    fn page_math_at_i64_bounds() {
        let huge_total = Page::<u8>::new(vec![], i64::MAX, 10, 0);
        assert_eq!(huge_total.total_pages(), i64::MAX / 10 + 1);
        assert!(huge_total.has_next_page());

        let huge_limit = Page::<u8>::new(vec![], 5, i64::MAX, 1);
        assert!(!huge_limit.has_next_page());
        assert_eq!(huge_limit.total_pages(), 1);
        assert_eq!(huge_limit.page_number(), 1);

        let last = Page::<u8>::new(vec![], i64::MAX, i64::MAX, 0);
        assert_eq!(last.total_pages(), 1);
        assert!(!last.has_next_page());

        let far = Page::<u8>::new(vec![], i64::MAX, 1, i64::MAX);
        assert_eq!(far.page_number(), i64::MAX);
        assert!(!far.has_next_page());
    }

    #[test]
    fn unlimited_page_is_single() {
        let page = Page::new(vec!["a"], 1, 0, 0);
        assert_eq!(page.page_number(), 1);
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn serializes_with_flat_metadata() {
        let json = serde_json::to_value(Page::new(vec!["a"], 1, 10, 0)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"data": ["a"], "total": 1, "limit": 10, "offset": 0})
        );
    }
}
