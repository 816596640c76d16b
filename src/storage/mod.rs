//! Storage Module
//!
//! Transactional key-value facade over an embedded ordered engine (redb).
//!
//! ## Responsibilities
//! - Own the engine handle (exclusive per data directory)
//! - Scope one transaction per operation, released on every exit path
//! - Point lookups, upserts and idempotent deletes
//! - Ordered snapshot scans for the query layer
//!
//! ## Transaction Model
//! ```text
//!   get / scan_all ──► begin_read  ──► MVCC snapshot (concurrent)
//!   set / delete   ──► begin_write ──► commit (serialized by engine)
//! ```
//!
//! Keys are ordered by byte-lexicographic comparison.

mod entry;
mod facade;
mod snapshot;

pub use entry::Entry;
pub use facade::StorageFacade;
pub use snapshot::Snapshot;
