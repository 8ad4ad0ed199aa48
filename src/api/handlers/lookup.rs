use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::response::{ApiError, AppJson, AppPath};
use crate::storage::{LookupSummary, Row, StorageError};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoadLookupRequest {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoadLookupResponse {
    pub success: bool,
    pub summary: LookupSummary,
}

// ============================================================================
// Handlers
// ============================================================================

/// Route: POST /load_lookup_path
pub async fn load_lookup_path(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoadLookupRequest>,
) -> Result<Json<LoadLookupResponse>, ApiError> {
    let path = req.path.unwrap_or_default();

    let loader = Arc::clone(&state);
    let summary = tokio::task::spawn_blocking(move || loader.lookup.load(&path))
        .await
        .map_err(StorageError::from)
        .and_then(|loaded| loaded)
        .map_err(|e| ApiError::from(e).context("Error loading file"))?;

    Ok(Json(LoadLookupResponse {
        success: true,
        summary,
    }))
}

/// Route: GET /get_uuid_page/:page
pub async fn get_uuid_page(
    State(state): State<Arc<AppState>>,
    AppPath(page): AppPath<usize>,
) -> Result<Json<Vec<Row>>, ApiError> {
    let rows = state.lookup.get_page(page)?;
    tracing::debug!(page, rows = rows.len(), "Served lookup page");
    Ok(Json(rows))
}
