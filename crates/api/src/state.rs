//! Shared application state for the Axum API server.

use std::sync::Arc;

use huddle_dispatch::dispatcher::Dispatcher;
use huddle_dispatch::store::NotificationStore;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub store: Arc<dyn NotificationStore>,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>, store: Arc<dyn NotificationStore>) -> Self {
        Self { dispatcher, store }
    }
}
