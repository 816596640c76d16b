//! Query Service
//!
//! Runs the single-pass scan that produces `total` and the page window.

use std::sync::Arc;
use std::time::Instant;

use crate::error::{Result, StrataError};
use crate::storage::StorageFacade;

use super::{KeyMatcher, RegexMatcher, ScanQuery, ScanResult};

/// Filtered, paginated listing over a [`StorageFacade`]
///
/// Cheap to clone; every clone shares the same store. Each call opens its
/// own snapshot, so concurrent calls never block one another.
#[derive(Clone)]
pub struct QueryService {
    store: Arc<StorageFacade>,
}

impl QueryService {
    /// Entries visited between deadline / closed checks
    const DEADLINE_CHECK_INTERVAL: usize = 64;

    pub fn new(store: Arc<StorageFacade>) -> Self {
        Self { store }
    }

    /// List keys matching `query.pattern`
    pub fn list(&self, query: &ScanQuery) -> Result<ScanResult> {
        self.list_until(query, None)
    }

    /// List with an optional deadline
    ///
    /// The pattern is compiled before the engine is touched, so a bad
    /// pattern never opens a transaction.
    pub fn list_until(&self, query: &ScanQuery, deadline: Option<Instant>) -> Result<ScanResult> {
        let matcher = RegexMatcher::compile(&query.pattern)?;
        self.list_with(&matcher, query.skip, query.limit, deadline)
    }

    /// Scan with any matcher
    ///
    /// Algorithm (one snapshot, one pass, no early exit):
    /// 1. Skip keys the matcher rejects
    /// 2. Count every match toward `total`
    /// 3. Let the first `skip` matches pass without emitting them
    /// 4. Collect up to `limit` matches after that
    ///
    /// If the deadline passes mid-scan the snapshot is dropped and
    /// `Timeout` is returned; if the store is closed mid-scan, `Closed`.
    /// No partial result ever escapes.
    pub fn list_with<M>(
        &self,
        matcher: &M,
        skip: usize,
        limit: usize,
        deadline: Option<Instant>,
    ) -> Result<ScanResult>
    where
        M: KeyMatcher + ?Sized,
    {
        let started = Instant::now();
        let snapshot = self.store.scan_all()?;

        let mut total = 0usize;
        let mut skipped = 0usize;
        let mut items = Vec::with_capacity(limit.min(64));

        for (visited, entry) in snapshot.entries()?.enumerate() {
            if visited % Self::DEADLINE_CHECK_INTERVAL == 0 {
                if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                    tracing::warn!(
                        "Scan abandoned after {} entries ({} matches so far): deadline exceeded",
                        visited,
                        total
                    );
                    return Err(StrataError::Timeout);
                }
                if self.store.is_closed() {
                    tracing::warn!("Scan abandoned after {} entries: store closed", visited);
                    return Err(StrataError::Closed);
                }
            }

            let entry = entry?;
            if !matcher.matches(&entry.key) {
                continue;
            }

            total += 1;
            if skipped < skip {
                skipped += 1;
            } else if items.len() < limit {
                items.push(entry);
            }
        }

        tracing::debug!(
            total,
            returned = items.len(),
            skip,
            limit,
            elapsed_us = started.elapsed().as_micros() as u64,
            "scan complete"
        );

        Ok(ScanResult { total, items })
    }

    /// Get the underlying store
    pub fn store(&self) -> &Arc<StorageFacade> {
        &self.store
    }
}
