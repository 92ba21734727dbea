//! GalleryService: composes the row store and the image store.
//!
//! There is no shared transaction between the two. Create writes the row first and removes it
//! again if storing images fails; delete removes images first, then the row.

use crate::error::AppError;
use crate::images::{check_content_types, ImageStore};
use crate::model::{Gallery, NewGallery, UploadedImage};
use crate::store::GalleryStore;
use crate::validation::GalleryValidator;
use std::sync::Arc;

#[derive(Clone)]
pub struct GalleryService {
    galleries: Arc<dyn GalleryStore>,
    images: ImageStore,
}

impl GalleryService {
    pub fn new(galleries: Arc<dyn GalleryStore>, images: ImageStore) -> Self {
        Self { galleries, images }
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.galleries.ping().await
    }

    /// Validate, persist, and attach images. Images are only stored when the first part carries data.
    /// The returned image list is sorted like every read of the gallery.
    pub async fn create_gallery(&self, input: &NewGallery, files: &[UploadedImage]) -> Result<Gallery, AppError> {
        let fields = GalleryValidator::validate(input)?;
        let has_images = files.first().is_some_and(|f| !f.is_empty());
        if has_images {
            if let Err(e) = check_content_types(files) {
                tracing::warn!(error = %e, "upload rejected");
                return Err(e);
            }
        }

        let mut gallery = self.galleries.insert(&fields).await?;
        gallery.images = if has_images {
            match self.images.save_images(gallery.id, files).await {
                Ok(mut names) => {
                    names.sort();
                    names
                }
                Err(e) => {
                    tracing::warn!(id = gallery.id, error = %e, "image storage failed, removing gallery row");
                    if let Err(cleanup) = self.galleries.delete(gallery.id).await {
                        tracing::warn!(id = gallery.id, error = %cleanup, "gallery row cleanup failed");
                    }
                    return Err(e);
                }
            }
        } else {
            Vec::new()
        };
        tracing::info!(id = gallery.id, images = gallery.images.len(), "gallery created");
        Ok(gallery)
    }

    pub async fn list_galleries(&self) -> Result<Vec<Gallery>, AppError> {
        let mut galleries = self.galleries.list().await?;
        for gallery in &mut galleries {
            gallery.images = self.images.get_images(gallery.id).await?;
        }
        Ok(galleries)
    }

    pub async fn get_gallery(&self, id: i64) -> Result<Gallery, AppError> {
        let mut gallery = self
            .galleries
            .find(id)
            .await?
            .ok_or_else(|| AppError::gallery_not_found(id))?;
        gallery.images = self.images.get_images(id).await?;
        Ok(gallery)
    }

    pub async fn delete_gallery(&self, id: i64) -> Result<(), AppError> {
        if self.galleries.find(id).await?.is_none() {
            return Err(AppError::gallery_not_found(id));
        }
        self.images.delete_images(id).await?;
        if !self.galleries.delete(id).await? {
            return Err(AppError::gallery_not_found(id));
        }
        tracing::info!(id, "gallery deleted");
        Ok(())
    }
}
