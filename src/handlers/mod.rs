//! HTTP handlers for gallery CRUD and health checks.

pub mod common;
pub mod gallery;
