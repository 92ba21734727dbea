//! Gallery CRUD handlers: create (multipart), list, read, delete.

use crate::error::AppError;
use crate::model::{Gallery, NewGallery, UploadedImage};
use crate::state::AppState;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::PathRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;

/// Multipart field carrying image files; may repeat.
pub const IMAGES_FIELD: &str = "gallery_images";

fn path_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    id.map(|Path(id)| id)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

/// Split the form into gallery fields and image parts. Unknown fields are skipped.
async fn read_gallery_form(multipart: &mut Multipart) -> Result<(NewGallery, Vec<UploadedImage>), AppError> {
    let mut gallery = NewGallery::default();
    let mut images = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => gallery.title = Some(field.text().await.map_err(multipart_error)?),
            "description" => gallery.description = Some(field.text().await.map_err(multipart_error)?),
            IMAGES_FIELD => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                images.push(UploadedImage {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            other => tracing::debug!(field = %other, "ignoring unknown form field"),
        }
    }
    Ok((gallery, images))
}

/// POST /api/gallery: multipart form with `title`, `description` and optional `gallery_images` parts.
pub async fn create(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Gallery>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let (gallery, images) = read_gallery_form(&mut multipart).await?;
    let created = state.galleries.create_gallery(&gallery, &images).await?;
    Ok(Json(created))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Gallery>>, AppError> {
    Ok(Json(state.galleries.list_galleries().await?))
}

pub async fn read(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Gallery>, AppError> {
    let id = path_id(id)?;
    Ok(Json(state.galleries.get_gallery(id).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = path_id(id)?;
    state.galleries.delete_gallery(id).await?;
    Ok(StatusCode::OK)
}
