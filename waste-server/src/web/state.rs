//! Application state for the web layer.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::query::QueryEngine;
use crate::routes::RouteTable;
use crate::store::RecordStore;

/// Shared application state.
///
/// Everything here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Validated configuration model
    pub catalog: Arc<Catalog>,

    /// Routes generated from the catalog
    pub routes: Arc<RouteTable>,

    /// Query engine over the record store
    pub engine: QueryEngine,
}

impl AppState {
    /// Create a new app state.
    pub fn new(catalog: Catalog, routes: RouteTable, store: Arc<dyn RecordStore>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            routes: Arc::new(routes),
            engine: QueryEngine::new(store),
        }
    }
}
