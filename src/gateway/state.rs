use std::sync::Arc;

use crate::service::PriceService;

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    /// Price service (batch lifecycle + latest-value reads)
    pub service: Arc<PriceService>,
}

impl AppState {
    pub fn new(service: Arc<PriceService>) -> Self {
        Self { service }
    }
}
