//! HTTP Module
//!
//! JSON API over the store.
//!
//! ## Routes
//! ```text
//!   GET    /api/items/?search=&page=&page_size=   → 200 {total, data}
//!   GET    /api/items/{key}/                      → 200 {key, value} | 404
//!   POST   /api/items/   {key, value}             → 204
//!   DELETE /api/items/{key}/                      → 204 (absent key too)
//! ```
//!
//! Errors are `{"error": "..."}`: 400 for bad patterns, pages and bodies,
//! 404 for missing keys, 500 for everything else.

mod error;
mod handlers;
mod server;

pub use error::ApiError;
pub use handlers::{ItemBody, ListParams, ListResponse, SetRequest};
pub use server::Server;
