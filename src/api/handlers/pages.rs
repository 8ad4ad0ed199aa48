use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;

use crate::api::response::ApiError;
use crate::AppState;

/// Serve the viewer page shell.
/// Route: GET /
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let template = Path::new(&state.config.assets.template_dir).join("index.html");
    let page = tokio::fs::read_to_string(&template).await.map_err(|e| {
        ApiError::internal(format!(
            "Failed to read page template {}: {e}",
            template.display()
        ))
    })?;
    Ok(Html(page))
}
