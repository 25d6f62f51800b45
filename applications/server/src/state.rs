/// Shared application state
use favorites_core::FavoritesStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FavoritesStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn FavoritesStore>) -> Self {
        Self { store }
    }
}
