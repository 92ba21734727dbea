//! Gallery records and upload payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted gallery. `images` is never stored with the row; it is filled from the
/// image directory each time the gallery is returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Gallery {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub images: Vec<String>,
}

/// Client-supplied gallery fields, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewGallery {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl NewGallery {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }
}

/// One `gallery_images` part of a create request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
