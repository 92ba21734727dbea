//! Gallery API: CRUD over image galleries backed by PostgreSQL rows and per-gallery image directories.

pub mod config;
pub mod error;
pub mod handlers;
pub mod images;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use images::ImageStore;
pub use model::{Gallery, NewGallery, UploadedImage};
pub use response::ErrorResponse;
pub use routes::{app, common_routes, gallery_routes};
pub use service::GalleryService;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_gallery_table, GalleryStore, PgGalleryStore};
