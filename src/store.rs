//! Gallery persistence: the `GalleryStore` seam, its PostgreSQL implementation, and bootstrap DDL.

use crate::error::AppError;
use crate::model::Gallery;
use crate::validation::GalleryFields;
use async_trait::async_trait;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

pub const GALLERY_TABLE: &str = "galleries";

/// Row-level gallery persistence. Images are not part of the row.
#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// Insert a row and return it with its generated id and creation time.
    async fn insert(&self, fields: &GalleryFields) -> Result<Gallery, AppError>;
    /// All rows in ascending id order.
    async fn list(&self) -> Result<Vec<Gallery>, AppError>;
    async fn find(&self, id: i64) -> Result<Option<Gallery>, AppError>;
    /// Delete one row. Returns false when no row had that id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
    /// Cheap liveness check for `/ready`.
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct PgGalleryStore {
    pool: PgPool,
}

impl PgGalleryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GalleryStore for PgGalleryStore {
    async fn insert(&self, fields: &GalleryFields) -> Result<Gallery, AppError> {
        let sql = format!(
            "INSERT INTO {} (title, description) VALUES ($1, $2) RETURNING id, title, description, created",
            GALLERY_TABLE
        );
        tracing::debug!(sql = %sql, "query");
        let gallery = sqlx::query_as::<_, Gallery>(&sql)
            .bind(&fields.title)
            .bind(&fields.description)
            .fetch_one(&self.pool)
            .await?;
        Ok(gallery)
    }

    async fn list(&self) -> Result<Vec<Gallery>, AppError> {
        let sql = format!("SELECT id, title, description, created FROM {} ORDER BY id", GALLERY_TABLE);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Gallery>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find(&self, id: i64) -> Result<Option<Gallery>, AppError> {
        let sql = format!("SELECT id, title, description, created FROM {} WHERE id = $1", GALLERY_TABLE);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Gallery>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", GALLERY_TABLE);
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Create the gallery table if it does not exist.
pub async fn ensure_gallery_table(pool: &PgPool) -> Result<(), AppError> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            created TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        GALLERY_TABLE
    );
    sqlx::query(&ddl).execute(pool).await?;
    Ok(())
}

/// Connect to the `postgres` maintenance database and create the target database if missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::Internal(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split a connection URL into an admin URL for the `postgres` database and the target database name.
/// A URL without a path names no database; the name comes back empty and the URL is returned as is.
fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let authority_start = url.find("://").map(|i| i + 3).unwrap_or(0);
    let (before_query, query) = match url.find('?') {
        Some(q) if q >= authority_start => (&url[..q], &url[q..]),
        _ => (url, ""),
    };
    let Some(slash) = before_query[authority_start..].find('/') else {
        return Ok((url.to_string(), String::new()));
    };
    let path_start = authority_start + slash + 1;
    let db_name = before_query[path_start..].trim();
    let base = &before_query[..path_start];
    Ok((format!("{}postgres{}", base, query), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
