//! Filesystem image storage. Each gallery owns one directory, `<root>/<gallery id>/`,
//! and an image is nothing more than a file in it.

use crate::error::AppError;
use crate::model::UploadedImage;
use regex::Regex;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const ACCEPTED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/bmp",
];

const FALLBACK_FILE_NAME: &str = "image";
const UNSAFE_FILE_NAME_CHARS: &str = r"[^A-Za-z0-9._-]";

fn unsafe_file_name_chars() -> Result<&'static Regex, AppError> {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = UNSAFE.get() {
        return Ok(re);
    }
    let re = Regex::new(UNSAFE_FILE_NAME_CHARS)
        .map_err(|e| AppError::Internal(format!("invalid file name pattern: {}", e)))?;
    Ok(UNSAFE.get_or_init(|| re))
}

/// True when the declared content type (parameters ignored) is an accepted image type.
pub fn is_accepted_content_type(content_type: Option<&str>) -> bool {
    let Some(ct) = content_type else {
        return false;
    };
    let essence = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    ACCEPTED_CONTENT_TYPES.contains(&essence.as_str())
}

/// Reject the whole batch if any file has a disallowed content type.
pub fn check_content_types(files: &[UploadedImage]) -> Result<(), AppError> {
    for file in files {
        if !is_accepted_content_type(file.content_type.as_deref()) {
            return Err(AppError::InvalidFileType {
                file_name: file.file_name.clone().unwrap_or_default(),
                content_type: file.content_type.clone().unwrap_or_else(|| "(none)".into()),
            });
        }
    }
    Ok(())
}

/// Reduce a client filename to a safe single path component.
pub fn sanitize_file_name(name: Option<&str>) -> Result<String, AppError> {
    let unsafe_chars = unsafe_file_name_chars()?;
    let base = name
        .unwrap_or("")
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();
    let cleaned = unsafe_chars.replace_all(base, "_");
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        Ok(FALLBACK_FILE_NAME.to_string())
    } else {
        Ok(cleaned.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn gallery_dir(&self, gallery_id: i64) -> PathBuf {
        self.root.join(gallery_id.to_string())
    }

    /// Create the storage root if missing.
    pub async fn ensure_root(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Write every file under the gallery's directory and return the stored names in input order.
    /// Nothing is written unless every file has an accepted content type; a write failure
    /// removes the gallery directory before the error is returned.
    pub async fn save_images(&self, gallery_id: i64, files: &[UploadedImage]) -> Result<Vec<String>, AppError> {
        check_content_types(files)?;
        let dir = self.gallery_dir(gallery_id);
        match self.write_all(&dir, files).await {
            Ok(names) => {
                tracing::debug!(gallery_id, count = names.len(), dir = %dir.display(), "images stored");
                Ok(names)
            }
            Err(e) => {
                tracing::warn!(gallery_id, error = %e, "image write failed, removing partial upload");
                if let Err(cleanup) = self.delete_images(gallery_id).await {
                    tracing::warn!(gallery_id, error = %cleanup, "cleanup of partial upload failed");
                }
                Err(e)
            }
        }
    }

    async fn write_all(&self, dir: &Path, files: &[UploadedImage]) -> Result<Vec<String>, AppError> {
        tokio::fs::create_dir_all(dir).await?;
        let mut taken: HashSet<String> = self.list_dir(dir).await?.into_iter().collect();
        let mut names = Vec::with_capacity(files.len());
        for file in files {
            let mut name = sanitize_file_name(file.file_name.as_deref())?;
            if taken.contains(&name) {
                name = format!("{}_{}", uuid::Uuid::new_v4().simple(), name);
            }
            tokio::fs::write(dir.join(&name), &file.bytes).await?;
            taken.insert(name.clone());
            names.push(name);
        }
        Ok(names)
    }

    /// Names of every file currently stored for the gallery, sorted. A missing directory is empty.
    pub async fn get_images(&self, gallery_id: i64) -> Result<Vec<String>, AppError> {
        let mut names = self.list_dir(&self.gallery_dir(gallery_id)).await?;
        names.sort();
        Ok(names)
    }

    async fn list_dir(&self, dir: &Path) -> Result<Vec<String>, AppError> {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    /// Remove the gallery's directory and everything in it. Missing directory is a no-op.
    pub async fn delete_images(&self, gallery_id: i64) -> Result<(), AppError> {
        let dir = self.gallery_dir(gallery_id);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {
                tracing::debug!(gallery_id, dir = %dir.display(), "image directory removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
