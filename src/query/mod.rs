//! Query Module
//!
//! Filtered, paginated scans over the store.
//!
//! ## Responsibilities
//! - Compile the key pattern before touching the engine
//! - Count every matching key across the whole keyspace (`total`)
//! - Return the requested window of matches in ascending key order
//! - Abandon a scan that runs past its deadline
//!
//! ## Scan Window
//! ```text
//!   matches:  m0  m1  m2  m3  m4  m5  m6  m7
//!             └─skip─┘ └──limit──┘
//!                      items          (total = 8)
//! ```
//!
//! The whole snapshot is always visited: `total` is only correct once the
//! last key has been seen.

mod matcher;
mod request;
mod service;

pub use matcher::{KeyMatcher, MatchAll, PrefixMatcher, RegexMatcher};
pub use request::{ScanQuery, ScanResult};
pub use service::QueryService;
