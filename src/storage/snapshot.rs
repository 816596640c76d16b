//! Read Snapshot
//!
//! A scoped read transaction that yields entries in ascending key order.

use std::sync::Arc;

use redb::{Database, ReadOnlyTable, ReadTransaction, ReadableTable, ReadableTableMetadata};

use crate::error::{Result, StrataError};

use super::facade::ITEMS_TABLE;
use super::Entry;

/// Point-in-time view of the store
///
/// Holds one read transaction open until dropped. Fields drop in
/// declaration order: table, then transaction, then the engine handle.
pub struct Snapshot {
    table: ReadOnlyTable<&'static [u8], &'static [u8]>,
    _txn: ReadTransaction,
    _db: Arc<Database>,
}

impl Snapshot {
    pub(super) fn begin(db: Arc<Database>) -> Result<Self> {
        let txn = db
            .begin_read()
            .map_err(|e| StrataError::storage("begin_read", e))?;
        let table = txn
            .open_table(ITEMS_TABLE)
            .map_err(|e| StrataError::storage("open_table", e))?;

        Ok(Self {
            table,
            _txn: txn,
            _db: db,
        })
    }

    /// Lazily iterate all entries in ascending key order
    ///
    /// Each item is copied out of the engine; an engine failure surfaces
    /// as an `Err` item and the caller is expected to stop there.
    pub fn entries(&self) -> Result<impl Iterator<Item = Result<Entry>> + '_> {
        let range = self
            .table
            .iter()
            .map_err(|e| StrataError::storage("iter", e))?;

        Ok(range.map(|item| {
            let (key, value) = item.map_err(|e| StrataError::storage("iter item", e))?;
            Ok(Entry::new(key.value(), value.value()))
        }))
    }

    /// Number of entries visible in this snapshot
    pub fn len(&self) -> Result<u64> {
        self.table
            .len()
            .map_err(|e| StrataError::storage("len", e))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
