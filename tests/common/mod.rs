#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use tower::ServiceExt;

use gallery_api::validation::GalleryFields;
use gallery_api::{app, AppConfig, AppError, AppState, Gallery, GalleryService, GalleryStore, ImageStore};

pub const BOUNDARY: &str = "gallery-test-boundary";

/// Row store backed by a vector, with ids handed out like a sequence.
#[derive(Default)]
pub struct InMemoryGalleryStore {
    rows: Mutex<Vec<Gallery>>,
    next_id: AtomicI64,
}

#[async_trait]
impl GalleryStore for InMemoryGalleryStore {
    async fn insert(&self, fields: &GalleryFields) -> Result<Gallery, AppError> {
        let gallery = Gallery {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            title: fields.title.clone(),
            description: fields.description.clone(),
            created: Utc::now(),
            images: Vec::new(),
        };
        self.rows.lock().unwrap().push(gallery.clone());
        Ok(gallery)
    }

    async fn list(&self) -> Result<Vec<Gallery>, AppError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find(&self, id: i64) -> Result<Option<Gallery>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|g| g.id == id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|g| g.id != id);
        Ok(rows.len() != before)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Store whose every call fails, for exercising the 500 path.
pub struct FailingGalleryStore;

#[async_trait]
impl GalleryStore for FailingGalleryStore {
    async fn insert(&self, _fields: &GalleryFields) -> Result<Gallery, AppError> {
        Err(AppError::Internal("database unavailable".into()))
    }

    async fn list(&self) -> Result<Vec<Gallery>, AppError> {
        Err(AppError::Internal("database unavailable".into()))
    }

    async fn find(&self, _id: i64) -> Result<Option<Gallery>, AppError> {
        Err(AppError::Internal("database unavailable".into()))
    }

    async fn delete(&self, _id: i64) -> Result<bool, AppError> {
        Err(AppError::Internal("database unavailable".into()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::Internal("database unavailable".into()))
    }
}

/// Store whose row is visible to `find` but already gone by the time `delete` runs,
/// as when another request deletes the same gallery in between.
pub struct VanishingGalleryStore;

#[async_trait]
impl GalleryStore for VanishingGalleryStore {
    async fn insert(&self, _fields: &GalleryFields) -> Result<Gallery, AppError> {
        Err(AppError::Internal("read-only store".into()))
    }

    async fn list(&self) -> Result<Vec<Gallery>, AppError> {
        Ok(Vec::new())
    }

    async fn find(&self, id: i64) -> Result<Option<Gallery>, AppError> {
        Ok(Some(Gallery {
            id,
            title: "Gone soon".into(),
            description: "Deleted concurrently".into(),
            created: Utc::now(),
            images: Vec::new(),
        }))
    }

    async fn delete(&self, _id: i64) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn test_config(upload_dir: &Path) -> AppConfig {
    AppConfig {
        database_url: "postgres://localhost/gallery_test".into(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 1024 * 1024,
        db_max_connections: 1,
        cors_origins: vec!["http://localhost:4200".into()],
    }
}

pub fn build_app_with_store(store: Arc<dyn GalleryStore>, upload_dir: &Path) -> Router {
    let config = test_config(upload_dir);
    let state = AppState {
        galleries: GalleryService::new(store, ImageStore::new(upload_dir)),
        config: Arc::new(config),
    };
    app(state)
}

/// Full router over an in-memory row store and a real image directory.
pub fn build_test_app(upload_dir: &Path) -> Router {
    build_app_with_store(Arc::new(InMemoryGalleryStore::default()), upload_dir)
}

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    pub fn image(self, file_name: &str, content_type: &str) -> Self {
        self.file("gallery_images", file_name, content_type, b"\x89PNG\r\n\x1a\nfake-image-bytes")
    }

    pub fn gallery(title: &str, description: &str) -> Self {
        Self::new().text("title", title).text("description", description)
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.bytes.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.bytes
    }
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_multipart(app: Router, uri: &str, body: MultipartBody) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body.finish()))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Assert the uniform error body shape and return its messages.
pub fn assert_error_body(json: &serde_json::Value, status: u16, error: &str) -> Vec<String> {
    assert_eq!(json["status"], status);
    assert_eq!(json["error"], error);
    assert!(json["timestamp"].as_str().is_some_and(|ts| ts.ends_with('Z')), "timestamp: {}", json["timestamp"]);
    json["messages"]
        .as_array()
        .expect("messages must be an array")
        .iter()
        .map(|m| m.as_str().unwrap().to_string())
        .collect()
}
