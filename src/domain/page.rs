//! Paginated listings returned by the backend.

use serde::{Deserialize, Serialize};

use super::anomaly::Anomaly;
use super::transaction::TransactionRecord;

const fn one() -> u32 {
    1
}

/// One page of anomalies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPage {
    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "one")]
    pub page: u32,
    #[serde(default = "one")]
    pub pages: u32,
}

/// One page of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPage {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "one")]
    pub page: u32,
    #[serde(default = "one")]
    pub pages: u32,
}

/// Page navigation clamped to `1..=pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
    pages: u32,
}

impl PageCursor {
    #[must_use]
    pub fn new(page: u32, pages: u32) -> Self {
        let pages = pages.max(1);
        Self {
            page: page.clamp(1, pages),
            pages,
        }
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn pages(&self) -> u32 {
        self.pages
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.pages
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::new(self.page.saturating_add(1), self.pages)
    }

    #[must_use]
    pub fn previous(self) -> Self {
        Self::new(self.page.saturating_sub(1), self.pages)
    }

    /// Adopt the page count reported by a freshly fetched page.
    #[must_use]
    pub fn with_pages(self, pages: u32) -> Self {
        Self::new(self.page, pages)
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_clamps_at_both_ends() {
        let cursor = PageCursor::new(1, 3);
        assert!(!cursor.has_previous());
        assert_eq!(cursor.previous().page(), 1);

        let last = cursor.next().next().next();
        assert_eq!(last.page(), 3);
        assert!(!last.has_next());
    }

    #[test]
    fn cursor_shrinks_with_page_count() {
        let cursor = PageCursor::new(5, 5).with_pages(2);
        assert_eq!(cursor.page(), 2);
    }

    #[test]
    fn zero_pages_is_one_page() {
        let cursor = PageCursor::new(0, 0);
        assert_eq!(cursor.page(), 1);
        assert_eq!(cursor.pages(), 1);
    }

    #[test]
    fn anomaly_page_defaults_to_single_page() {
        let page: AnomalyPage = serde_json::from_str(r#"{"anomalies": []}"#).unwrap();
        assert_eq!(page.pages, 1);
        assert_eq!(page.page, 1);
    }
}
