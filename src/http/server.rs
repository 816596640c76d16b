//! HTTP Server
//!
//! Binds the listener, serves the router and closes the store on the way out.

use std::future::{Future, IntoFuture};
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::Result;
use crate::query::QueryService;
use crate::storage::StorageFacade;

use super::handlers::{self, AppState};

/// HTTP server for StrataKV
pub struct Server {
    config: Config,
    store: Arc<StorageFacade>,
}

impl Server {
    /// Create a new server with the given config and store
    pub fn new(config: Config, store: Arc<StorageFacade>) -> Self {
        Self { config, store }
    }

    /// Build the router (also used directly by tests)
    pub fn router(&self) -> Router {
        let state = AppState {
            store: Arc::clone(&self.store),
            query: QueryService::new(Arc::clone(&self.store)),
            request_timeout: self.config.request_timeout(),
            default_page_size: self.config.default_page_size,
        };

        Router::new()
            .route(
                "/api/items/",
                get(handlers::list_items).post(handlers::set_item),
            )
            .route(
                "/api/items/{key}/",
                get(handlers::get_item).delete(handlers::delete_item),
            )
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener
    ///
    /// Shutdown sequence:
    /// 1. `shutdown` resolves, the listener stops accepting
    /// 2. In-flight requests get `shutdown_timeout` to finish
    /// 3. The store is closed (exactly once)
    ///
    /// Scans still running on the blocking pool when the drain bound hits
    /// are not cancelled by dropping the serve future; they notice the
    /// closed store at their next deadline check and return `Closed`.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("Listening on http://{}", listener.local_addr()?);

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let graceful = async move {
            shutdown.await;
            tracing::info!("Shutdown requested, draining in-flight requests");
            let _ = stop_tx.send(true);
        };

        let drain_timeout = self.config.shutdown_timeout();
        let drain_deadline = async move {
            let _ = stop_rx.wait_for(|stopped| *stopped).await;
            tokio::time::sleep(drain_timeout).await;
        };

        let server = axum::serve(listener, self.router())
            .with_graceful_shutdown(graceful)
            .into_future();

        let result: Result<()> = tokio::select! {
            served = server => served.map_err(Into::into),
            _ = drain_deadline => {
                tracing::warn!(
                    "In-flight requests still running after {:?}, aborting them",
                    drain_timeout
                );
                Ok(())
            }
        };

        self.store.close();
        tracing::info!("Server stopped");
        result
    }
}
