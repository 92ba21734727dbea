//! Router assembly: health checks, gallery API, stored image files, and the shared middleware stack.

mod common;
mod gallery;

pub use common::common_routes;
pub use gallery::gallery_routes;

use crate::error::AppError;
use crate::state::AppState;
use axum::extract::{DefaultBodyLimit, OriginalUri};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{middleware, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Full application router with middleware, as served by the binary.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", gallery_routes(state.clone()))
        .nest_service("/images", ServeDir::new(state.galleries.images().root()))
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(middleware::map_response(framework_errors_as_json))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}

async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(format!("No handler found for {} {}", method, uri.path()))
}

/// Rewrite bare 404/405/413 responses produced by the router, file service, or body limit into the uniform error body.
async fn framework_errors_as_json(method: Method, OriginalUri(uri): OriginalUri, response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|ct| ct.as_bytes().starts_with(b"application/json"));
    if is_json {
        return response;
    }
    let err = match response.status() {
        StatusCode::NOT_FOUND => AppError::NotFound(format!("No resource found for {} {}", method, uri.path())),
        StatusCode::METHOD_NOT_ALLOWED => AppError::MethodNotAllowed(method.to_string()),
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge("Request body is too large".into()),
        _ => return response,
    };
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rewritten = err.into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(header::ALLOW, allow);
    }
    rewritten
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
