//! Storage Facade
//!
//! Owns the engine handle and exposes get/set/delete/scan_all.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use redb::{Database, DatabaseError, TableDefinition};

use crate::config::Config;
use crate::error::{Result, StrataError};

use super::Snapshot;

/// Single table holding every item, keyed by raw bytes
pub(super) const ITEMS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("items");

/// Transactional key-value facade
///
/// ## Concurrency:
/// - Reads run in their own read transaction (MVCC, never block each other)
/// - Writes run in their own write transaction (the engine serializes them)
/// - `db`: the only lock here; it guards the open/closed slot, not the data
///
/// ## Lifecycle:
/// `close()` empties the slot. Operations already holding a handle finish
/// against it; the engine is dropped once the last of them returns.
pub struct StorageFacade {
    /// Path of the database file inside the data directory
    path: PathBuf,

    /// Engine handle, `None` once closed
    db: RwLock<Option<Arc<Database>>>,
}

impl StorageFacade {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const DB_FILENAME: &'static str = "items.redb";

    /// Open or create the store described by `config`
    ///
    /// On startup:
    /// 1. Create the data directory if needed
    /// 2. Open the database file (fails if another instance holds it)
    /// 3. Make sure the items table exists
    pub fn open(config: &Config) -> Result<Self> {
        // Step 1: Create data directory if it doesn't exist
        fs::create_dir_all(&config.data_dir)?;
        let path = config.data_dir.join(Self::DB_FILENAME);

        // Step 2: Open the engine
        let mut builder = Database::builder();
        builder.set_cache_size(config.cache_size_bytes);
        let db = builder.create(&path).map_err(|e| match e {
            DatabaseError::DatabaseAlreadyOpen => StrataError::Locked(path.clone()),
            other => StrataError::storage("open", other),
        })?;

        // Step 3: Warm-create the table so readers never see it missing
        let txn = db
            .begin_write()
            .map_err(|e| StrataError::storage("begin_write", e))?;
        {
            let _table = txn
                .open_table(ITEMS_TABLE)
                .map_err(|e| StrataError::storage("open_table", e))?;
        }
        txn.commit().map_err(|e| StrataError::storage("commit", e))?;

        tracing::debug!("Opened store at {}", path.display());

        Ok(Self {
            path,
            db: RwLock::new(Some(Arc::new(db))),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(&config)
    }

    /// Release the engine handle
    ///
    /// Idempotent. Returns `true` only for the call that actually closed it.
    pub fn close(&self) -> bool {
        let closed = self.db.write().take().is_some();
        if closed {
            tracing::debug!("Closed store at {}", self.path.display());
        }
        closed
    }

    pub fn is_closed(&self) -> bool {
        self.db.read().is_none()
    }

    /// Get a value by key
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let db = self.handle()?;
        let txn = db
            .begin_read()
            .map_err(|e| StrataError::storage("begin_read", e))?;
        let table = txn
            .open_table(ITEMS_TABLE)
            .map_err(|e| StrataError::storage("open_table", e))?;

        let guard = table
            .get(key)
            .map_err(|e| StrataError::storage("get", e))?;
        guard
            .map(|value| value.value().to_vec())
            .ok_or(StrataError::KeyNotFound)
    }

    /// Insert or overwrite a key
    ///
    /// Durable once this returns `Ok`. Any early return drops the write
    /// transaction uncommitted, which rolls it back.
    pub fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let db = self.handle()?;
        let txn = db
            .begin_write()
            .map_err(|e| StrataError::storage("begin_write", e))?;
        {
            let mut table = txn
                .open_table(ITEMS_TABLE)
                .map_err(|e| StrataError::storage("open_table", e))?;
            table
                .insert(key, value)
                .map_err(|e| StrataError::storage("insert", e))?;
        }
        txn.commit().map_err(|e| StrataError::storage("commit", e))?;
        Ok(())
    }

    /// Delete a key
    ///
    /// Deleting an absent key is not an error.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        let db = self.handle()?;
        let txn = db
            .begin_write()
            .map_err(|e| StrataError::storage("begin_write", e))?;
        let existed = {
            let mut table = txn
                .open_table(ITEMS_TABLE)
                .map_err(|e| StrataError::storage("open_table", e))?;
            let removed = table
                .remove(key)
                .map_err(|e| StrataError::storage("remove", e))?;
            removed.is_some()
        };
        txn.commit().map_err(|e| StrataError::storage("commit", e))?;

        if !existed {
            tracing::trace!("Delete of absent key ({} bytes)", key.len());
        }
        Ok(())
    }

    /// Open a read-only snapshot for an ordered scan
    ///
    /// Writes committed after this call are invisible to the snapshot.
    /// Calling again opens a fresh snapshot.
    pub fn scan_all(&self) -> Result<Snapshot> {
        let db = self.handle()?;
        Snapshot::begin(db)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn handle(&self) -> Result<Arc<Database>> {
        self.db.read().as_ref().map(Arc::clone).ok_or(StrataError::Closed)
    }
}
