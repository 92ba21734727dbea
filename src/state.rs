//! Shared application state for all routes.

use crate::config::AppConfig;
use crate::service::GalleryService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub galleries: GalleryService,
    pub config: Arc<AppConfig>,
}
