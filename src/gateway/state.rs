use std::sync::Arc;

use crate::controllers::Controllers;
use crate::validation::SchemaRegistry;

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    /// Compiled contract schemas (read-only)
    pub registry: Arc<SchemaRegistry>,
    /// Business controllers
    pub controllers: Arc<Controllers>,
}

impl AppState {
    pub fn new(registry: SchemaRegistry, controllers: Controllers) -> Self {
        Self {
            registry: Arc::new(registry),
            controllers: Arc::new(controllers),
        }
    }
}
