//! gallery-server: loads config from env, prepares the database and upload root, serves the API.

use gallery_api::{
    app, ensure_database_exists, ensure_gallery_table, AppConfig, AppState, GalleryService, ImageStore, PgGalleryStore,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gallery_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    ensure_gallery_table(&pool).await?;

    let images = ImageStore::new(&config.upload_dir);
    images.ensure_root().await?;

    let state = AppState {
        galleries: GalleryService::new(Arc::new(PgGalleryStore::new(pool)), images),
        config: Arc::new(config.clone()),
    };

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(upload_dir = %config.upload_dir.display(), "listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
