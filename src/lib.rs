//! lookup-viewer - A local web backend for inspecting lookup tables
//!
//! This crate serves a single in-memory lookup table (`uuid -> filepath`) and,
//! per uuid, the matching entries from sibling data files:
//! - `{filepath}_images.h5`: raw image bytes under the `images` group
//! - `{filepath}_metadata.parquet`: one metadata row per uuid
//!
//! Nothing is cached; every image or metadata request reads its file afresh.

pub mod api;
pub mod config;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use config::Config;
use storage::LookupStore;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub lookup: LookupStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            lookup: LookupStore::new(),
        }
    }
}
