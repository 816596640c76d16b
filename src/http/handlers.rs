//! Request handlers for `/api/items/`
//!
//! Store calls are synchronous and may block on disk, so each one runs on
//! the blocking pool.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::query::{QueryService, ScanQuery, ScanResult};
use crate::storage::{Entry, StorageFacade};

use super::ApiError;

/// Shared state handed to every handler
#[derive(Clone)]
pub(crate) struct AppState {
    pub store: Arc<StorageFacade>,
    pub query: QueryService,
    pub request_timeout: Option<Duration>,
    pub default_page_size: usize,
}

// =============================================================================
// Request / Response Bodies
// =============================================================================

/// Query string of `GET /api/items/`
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub search: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<usize>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub page_size: Option<usize>,
}

/// `?page=` with no value means the parameter was left out
fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Body of `POST /api/items/`
#[derive(Debug, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: String,
}

/// A single item as rendered over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBody {
    pub key: String,
    pub value: String,
}

impl From<Entry> for ItemBody {
    fn from(entry: Entry) -> Self {
        Self {
            key: entry.key_lossy(),
            value: entry.value_lossy(),
        }
    }
}

/// Body of a successful list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    pub total: usize,
    pub data: Vec<ItemBody>,
}

impl From<ScanResult> for ListResponse {
    fn from(result: ScanResult) -> Self {
        Self {
            total: result.total,
            data: result.items.into_iter().map(ItemBody::from).collect(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/items/?search=&page=&page_size=`
pub(crate) async fn list_items(
    State(state): State<AppState>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> std::result::Result<Json<ListResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(state.default_page_size);
    let query = ScanQuery::from_page(params.search, page, page_size)?;
    let deadline = state.request_timeout.map(|timeout| Instant::now() + timeout);

    let service = state.query.clone();
    let result = blocking(move || service.list_until(&query, deadline)).await?;

    Ok(Json(result.into()))
}

/// `GET /api/items/{key}/`
pub(crate) async fn get_item(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> std::result::Result<Json<ItemBody>, ApiError> {
    let store = Arc::clone(&state.store);
    let lookup = key.clone();
    let value = blocking(move || store.get(lookup.as_bytes())).await?;

    Ok(Json(ItemBody {
        key,
        value: String::from_utf8_lossy(&value).into_owned(),
    }))
}

/// `POST /api/items/` with `{"key": .., "value": ..}`
///
/// The body is decoded as JSON whatever `Content-Type` says.
pub(crate) async fn set_item(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<StatusCode, ApiError> {
    let req: SetRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("invalid body: {}", e)))?;

    if req.key.is_empty() {
        return Err(ApiError::bad_request("key is required"));
    }
    if req.value.is_empty() {
        return Err(ApiError::bad_request("value is required"));
    }

    let store = Arc::clone(&state.store);
    blocking(move || store.set(req.key.as_bytes(), req.value.as_bytes())).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/items/{key}/`
pub(crate) async fn delete_item(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> std::result::Result<StatusCode, ApiError> {
    let store = Arc::clone(&state.store);
    blocking(move || store.delete(key.as_bytes())).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Run a store call on the blocking pool
async fn blocking<T, F>(f: F) -> std::result::Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(format!("blocking task failed: {}", e)))?;
    Ok(outcome?)
}
