//! Offset pagination utilities for `start`/`limit` style APIs.

use serde::{Deserialize, Serialize};

/// A single page request expressed as an offset and a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPage {
    pub start: usize,
    pub limit: usize,
}

impl OffsetPage {
    /// The first page for the given page size. A zero size is bumped to 1.
    pub fn first(limit: usize) -> Self {
        Self {
            start: 0,
            limit: limit.max(1),
        }
    }

    /// The page immediately after this one.
    pub fn next(self) -> Self {
        Self {
            start: self.start + self.limit,
            limit: self.limit,
        }
    }

    /// 1-based page number, for progress logging.
    pub fn number(&self) -> usize {
        self.start / self.limit + 1
    }
}

/// Returns true when no further pages should be requested.
///
/// Fetching stops on an empty page, on a short page, or once the reported
/// total has been reached.
pub fn is_exhausted(
    fetched_so_far: usize,
    total: Option<usize>,
    last_page_len: usize,
    limit: usize,
) -> bool {
    last_page_len == 0
        || last_page_len < limit
        || total.is_some_and(|total| fetched_so_far >= total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        let page = OffsetPage::first(25);
        assert_eq!(page.start, 0);
        assert_eq!(page.limit, 25);
        assert_eq!(page.number(), 1);
    }

    #[test]
    fn test_zero_limit_is_bumped() {
        assert_eq!(OffsetPage::first(0).limit, 1);
    }

    #[test]
    fn test_next_page_advances_by_limit() {
        let page = OffsetPage::first(25).next().next();
        assert_eq!(page.start, 50);
        assert_eq!(page.number(), 3);
    }

    #[test]
    fn test_exhausted_on_empty_or_short_page() {
        assert!(is_exhausted(0, None, 0, 25));
        assert!(is_exhausted(60, None, 10, 25));
        assert!(!is_exhausted(50, None, 25, 25));
    }

    #[test]
    fn test_exhausted_when_total_reached() {
        assert!(is_exhausted(50, Some(50), 25, 25));
        assert!(!is_exhausted(50, Some(51), 25, 25));
    }

    #[test]
    fn test_page_serializes() {
        let json = serde_json::to_value(OffsetPage::first(10)).unwrap();
        assert_eq!(json["start"], 0);
        assert_eq!(json["limit"], 10);
    }
}
