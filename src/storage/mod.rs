mod error;
pub mod images;
pub mod lookup;
pub mod metadata;
pub mod records;

pub use error::StorageError;
pub use images::{fetch_image, ImagePayload};
pub use lookup::{LookupStore, LookupSummary, LookupTable, PAGE_SIZE};
pub use metadata::fetch_metadata;
pub use records::Row;

/// Both resolver keys must be present and non-empty.
fn require_keys(uuid: &str, filepath: &str) -> Result<(), StorageError> {
    if uuid.is_empty() || filepath.is_empty() {
        return Err(StorageError::BadRequest(
            "Missing uuid or filepath".to_string(),
        ));
    }
    Ok(())
}
