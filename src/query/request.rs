//! Scan request and result types

use crate::error::{Result, StrataError};
use crate::storage::Entry;

/// A filtered scan over the whole keyspace
///
/// `limit = 0` is a count-only query: no items, correct `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanQuery {
    /// Regular expression matched against each key
    pub pattern: String,

    /// Matching keys to pass over before collecting items
    pub skip: usize,

    /// Maximum number of items to collect
    pub limit: usize,
}

impl ScanQuery {
    /// Count-only query for `pattern`
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            skip: 0,
            limit: 0,
        }
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Translate a 1-based page into a skip/limit window
    ///
    /// `skip = (page - 1) * page_size`, `limit = page_size`. Page 0 has no
    /// defined window and is rejected.
    pub fn from_page(pattern: impl Into<String>, page: usize, page_size: usize) -> Result<Self> {
        if page == 0 {
            return Err(StrataError::InvalidPagination(
                "page must be at least 1".to_string(),
            ));
        }

        let skip = (page - 1).checked_mul(page_size).ok_or_else(|| {
            StrataError::InvalidPagination(format!(
                "page {} with page_size {} is out of range",
                page, page_size
            ))
        })?;

        Ok(Self::new(pattern).skip(skip).limit(page_size))
    }
}

/// Outcome of a scan
///
/// `total` counts every match in the snapshot, including those consumed by
/// the skip window. `items` holds at most `limit` of them, in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub total: usize,
    pub items: Vec<Entry>,
}
