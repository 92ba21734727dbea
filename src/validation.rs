//! Gallery field validation. Every violation is collected so the error body can list them all.

use crate::error::AppError;
use crate::model::NewGallery;

pub const TITLE_MAX_LENGTH: usize = 255;
pub const DESCRIPTION_MAX_LENGTH: usize = 2000;

/// Gallery fields that passed validation, trimmed and ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryFields {
    pub title: String,
    pub description: String,
}

pub struct GalleryValidator;

impl GalleryValidator {
    pub fn validate(input: &NewGallery) -> Result<GalleryFields, AppError> {
        let mut violations = Vec::new();
        let title = required_text("title", input.title.as_deref(), TITLE_MAX_LENGTH, &mut violations);
        let description = required_text(
            "description",
            input.description.as_deref(),
            DESCRIPTION_MAX_LENGTH,
            &mut violations,
        );
        match (title, description) {
            (Some(title), Some(description)) if violations.is_empty() => Ok(GalleryFields { title, description }),
            _ => Err(AppError::Validation(violations)),
        }
    }
}

fn required_text(field: &str, value: Option<&str>, max: usize, violations: &mut Vec<String>) -> Option<String> {
    let trimmed = value.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        violations.push(format!("{} is required", field));
        return None;
    }
    if trimmed.chars().count() > max {
        violations.push(format!("{} must be at most {} characters", field, max));
        return None;
    }
    Some(trimmed.to_string())
}
