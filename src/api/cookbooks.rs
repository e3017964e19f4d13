//! Cookbook PDF downloads

use crate::api::error::ApiError;
use crate::core::cookbooks::{self, CookbookError};
use crate::infrastructure::config::AppConfig;
use axum::extract::{Path, Query};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use di_axum::Inject;
use log::{info, warn};
use serde::Deserialize;

pub fn router() -> Router {
    Router::new()
        .route("/download-cookbook", get(download_by_query))
        .route("/download/:cookbook_id", get(download_by_path))
}

#[derive(Deserialize, Debug)]
struct DownloadQuery {
    id: Option<String>,
}

async fn download_by_query(
    Inject(config): Inject<AppConfig>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Cookbook ID required"))?;

    download(&config, &id).await
}

async fn download_by_path(
    Inject(config): Inject<AppConfig>,
    Path(cookbook_id): Path<String>,
) -> Result<Response, ApiError> {
    download(&config, &cookbook_id).await
}

async fn download(config: &AppConfig, id: &str) -> Result<Response, ApiError> {
    let file = cookbooks::load(&config.cookbook_dir, id)
        .await
        .map_err(|e| match e {
            CookbookError::UnknownCookbook | CookbookError::MissingFile => {
                warn!("cookbook download `{id}`: {e}");
                ApiError::NotFound(e.to_string())
            }
            CookbookError::Read(e) => ApiError::internal("Download failed", e),
        })?;

    info!("serving cookbook `{id}` ({} bytes)", file.bytes.len());

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        file.download_name
    ))
    .map_err(|e| ApiError::internal("Download failed", e))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store, must-revalidate"),
            ),
            (header::PRAGMA, HeaderValue::from_static("no-cache")),
            (header::EXPIRES, HeaderValue::from_static("0")),
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
        ],
        file.bytes,
    )
        .into_response())
}
