//! Gallery CRUD routes, mounted under `/api`.

use crate::handlers::gallery::{create, delete as delete_handler, list, read};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn gallery_routes(state: AppState) -> Router {
    Router::new()
        .route("/gallery", get(list).post(create))
        .route("/gallery/:id", get(read).delete(delete_handler))
        .with_state(state)
}
