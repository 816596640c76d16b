//! # StrataKV
//!
//! An embedded key-value store served over HTTP, with:
//! - One transaction per operation (MVCC reads, serialized writes)
//! - Regex-filtered scans that report the total match count
//! - Page windows computed from the same snapshot as the total
//! - Explicit open/close lifecycle
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HTTP Server                             │
//! │               (axum, one task per request)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         │
//!   ┌─────────────┐                  │
//!   │ QueryService│                  │ get / set / delete
//!   │ (scan+page) │                  │
//!   └──────┬──────┘                  │
//!          │ scan_all                │
//!          ▼                         ▼
//!   ┌─────────────────────────────────────┐
//!   │            StorageFacade             │
//!   │   (owns the engine, scoped txns)     │
//!   └──────────────────┬──────────────────┘
//!                      │
//!                      ▼
//!              ┌─────────────┐
//!              │    redb     │
//!              │  (B-tree)   │
//!              └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod storage;
pub mod query;
pub mod http;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StrataError, Result};
pub use config::Config;
pub use storage::{Entry, StorageFacade};
pub use query::{QueryService, ScanQuery, ScanResult};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of StrataKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
