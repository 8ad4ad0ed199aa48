use axum::Json;
use serde::Deserialize;

use crate::api::response::{ApiError, AppJson};
use crate::storage::{fetch_image, fetch_metadata, ImagePayload, Row, StorageError};

/// Body shared by the image and metadata routes.
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub filepath: Option<String>,
}

impl ResolveRequest {
    fn into_keys(self) -> (String, String) {
        (
            self.uuid.unwrap_or_default(),
            self.filepath.unwrap_or_default(),
        )
    }
}

/// Route: POST /get_image
pub async fn get_image(
    AppJson(req): AppJson<ResolveRequest>,
) -> Result<Json<ImagePayload>, ApiError> {
    let (uuid, filepath) = req.into_keys();
    let payload = tokio::task::spawn_blocking(move || fetch_image(&uuid, &filepath))
        .await
        .map_err(StorageError::from)??;
    Ok(Json(payload))
}

/// Route: POST /get_metadata
pub async fn get_metadata(AppJson(req): AppJson<ResolveRequest>) -> Result<Json<Row>, ApiError> {
    let (uuid, filepath) = req.into_keys();
    let row = tokio::task::spawn_blocking(move || fetch_metadata(&uuid, &filepath))
        .await
        .map_err(StorageError::from)??;
    Ok(Json(row))
}
