//! Shared test helpers for in-crate handler tests.

use std::sync::Arc;

use crate::config::{AssetsConfig, Config, ServerConfig};
use crate::AppState;

/// Create a test AppState whose asset directories live inside `temp_dir`.
pub fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    let config = Config {
        server: ServerConfig {
            bind_address: "127.0.0.1:0".to_string(),
            ..Default::default()
        },
        assets: AssetsConfig {
            template_dir: temp_dir.path().join("templates").to_string_lossy().to_string(),
            static_dir: temp_dir.path().join("static").to_string_lossy().to_string(),
        },
    };

    Arc::new(AppState::new(config))
}

/// Write `contents` to `name` under `temp_dir`, creating parent directories.
/// Returns the absolute path as a string.
pub fn write_file(temp_dir: &tempfile::TempDir, name: &str, contents: &str) -> String {
    let path = temp_dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, contents).expect("Failed to write fixture");
    path.to_string_lossy().to_string()
}
