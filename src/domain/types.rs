use std::fmt;

use chrono::{DateTime, Local, Timelike};

pub const CHECKED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// The result page reported a total count.
    Indexed,
    /// Results were listed but no total was shown; the count is the number of listed entries.
    IndexedCountUnknown,
}

impl IndexStatus {
    pub fn label(&self) -> &'static str {
        match self {
            IndexStatus::Indexed => "indexed",
            IndexStatus::IndexedCountUnknown => "indexed (count unknown)",
        }
    }
}

impl fmt::Display for IndexStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A positive check outcome. Domains that are not indexed never produce one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCheckResult {
    domain: String,
    status: IndexStatus,
    indexed_pages: u64,
    checked_at: DateTime<Local>,
}

impl DomainCheckResult {
    pub fn new(
        domain: impl Into<String>,
        status: IndexStatus,
        indexed_pages: u64,
        checked_at: DateTime<Local>,
    ) -> Self {
        Self {
            domain: domain.into(),
            status,
            indexed_pages,
            checked_at: checked_at.with_nanosecond(0).unwrap_or(checked_at),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn status(&self) -> IndexStatus {
        self.status
    }

    pub fn indexed_pages(&self) -> u64 {
        self.indexed_pages
    }

    pub fn checked_time(&self) -> String {
        self.checked_at.format(CHECKED_TIME_FORMAT).to_string()
    }
}

/// Orders by `indexed_pages` descending. Equal counts keep their relative order.
pub fn sort_by_indexed_pages(results: &mut [DomainCheckResult]) {
    results.sort_by(|a, b| b.indexed_pages.cmp(&a.indexed_pages));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn result(domain: &str, pages: u64) -> DomainCheckResult {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 8, 5, 1).unwrap();
        DomainCheckResult::new(domain, IndexStatus::Indexed, pages, at)
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut rows = vec![
            result("a.com", 3),
            result("b.com", 10),
            result("c.com", 3),
            result("d.com", 10),
        ];
        sort_by_indexed_pages(&mut rows);
        let order: Vec<_> = rows.iter().map(|r| r.domain()).collect();
        assert_eq!(order, vec!["b.com", "d.com", "a.com", "c.com"]);

        let snapshot = rows.clone();
        sort_by_indexed_pages(&mut rows);
        assert_eq!(rows, snapshot);
    }

    #[test]
    fn checked_time_has_second_precision() {
        assert_eq!(result("a.com", 1).checked_time(), "2024-03-09 08:05:01");
    }

    #[test]
    fn status_labels() {
        assert_eq!(IndexStatus::Indexed.to_string(), "indexed");
        assert_eq!(
            IndexStatus::IndexedCountUnknown.to_string(),
            "indexed (count unknown)"
        );
    }
}
