//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::FarmerStore;
use crate::services::FarmerService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Generic over the farmer store so the router
/// can run against `PostgreSQL` or an in-memory store in tests.
pub struct AppState<S> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    farmers: FarmerService<S>,
}

// Manual impl: `derive(Clone)` would require `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: FarmerStore> AppState<S> {
    /// Create a new application state around a farmer store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                farmers: FarmerService::new(store),
            }),
        }
    }

    /// Get a reference to the farmer service.
    #[must_use]
    pub fn farmers(&self) -> &FarmerService<S> {
        &self.inner.farmers
    }
}
