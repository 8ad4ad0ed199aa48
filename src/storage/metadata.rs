use std::fs::File;
use std::path::Path;

use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value;

use super::lookup::UUID_COLUMN;
use super::records::{batch_row, column_values, Row};
use super::{require_keys, StorageError};

/// Appended to a lookup `filepath` to name its metadata table.
pub const METADATA_SUFFIX: &str = "_metadata.parquet";

pub fn metadata_path(filepath: &str) -> String {
    format!("{filepath}{METADATA_SUFFIX}")
}

/// Return the first row of `{filepath}_metadata.parquet` whose `uuid` equals `uuid`.
///
/// Duplicate uuids are tolerated; the earliest row in file order wins.
pub fn fetch_metadata(uuid: &str, filepath: &str) -> Result<Row, StorageError> {
    require_keys(uuid, filepath)?;

    let path = metadata_path(filepath);
    if !Path::new(&path).exists() {
        return Err(StorageError::NotFound(format!(
            "Metadata file not found: {path}"
        )));
    }

    let file = File::open(&path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let wanted = Value::from(uuid);

    for batch in reader {
        let batch = batch?;
        let uuids = batch.column_by_name(UUID_COLUMN).ok_or_else(|| {
            StorageError::Parse(format!("{path} has no '{UUID_COLUMN}' column"))
        })?;

        let position = column_values(uuids.as_ref())?
            .iter()
            .position(|v| *v == wanted);

        if let Some(index) = position {
            tracing::debug!(uuid = %uuid, path = %path, "Found metadata row");
            return batch_row(&batch, index);
        }
    }

    tracing::debug!(uuid = %uuid, path = %path, "No metadata row matched");
    Err(StorageError::NotFound(format!(
        "No metadata found for UUID {uuid}"
    )))
}
