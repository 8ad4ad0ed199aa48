//! The process-wide lookup table: `uuid -> filepath` plus any auxiliary columns.

use std::collections::HashSet;
use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Serialize;

use super::records::{batch_to_rows, column_values, Row};
use super::StorageError;

/// Fixed number of records per page.
pub const PAGE_SIZE: usize = 100;

pub const UUID_COLUMN: &str = "uuid";
pub const FILEPATH_COLUMN: &str = "filepath";

/// Records sampled for CSV schema inference.
const CSV_INFER_RECORDS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupSummary {
    pub total_records: usize,
    pub unique_filepaths: usize,
    pub columns: Vec<String>,
}

/// A fully loaded lookup table, held as a single Arrow batch in file order.
#[derive(Debug)]
pub struct LookupTable {
    batch: RecordBatch,
}

impl LookupTable {
    /// Read a `.csv` or `.parquet` file fully into memory.
    pub fn read(path: &Path) -> Result<Self, StorageError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let (schema, batches) = match extension.as_deref() {
            Some("csv") => read_csv(path)?,
            Some("parquet") => read_parquet(path)?,
            _ => return Err(StorageError::UnsupportedFormat),
        };

        let batch = concat_batches(&schema, &batches)?;
        Ok(Self { batch })
    }

    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn columns(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Required columns absent from this table, in declaration order.
    pub fn missing_columns(&self) -> Vec<String> {
        let schema = self.batch.schema();
        [UUID_COLUMN, FILEPATH_COLUMN]
            .into_iter()
            .filter(|name| schema.column_with_name(name).is_none())
            .map(str::to_string)
            .collect()
    }

    pub fn summary(&self) -> Result<LookupSummary, StorageError> {
        let filepaths = self
            .batch
            .column_by_name(FILEPATH_COLUMN)
            .ok_or_else(|| StorageError::Schema {
                missing: vec![FILEPATH_COLUMN.to_string()],
            })?;

        // Keyed on the JSON text so that null and the string "null" stay distinct.
        let unique_filepaths = column_values(filepaths.as_ref())?
            .iter()
            .map(|v| v.to_string())
            .collect::<HashSet<_>>()
            .len();

        Ok(LookupSummary {
            total_records: self.len(),
            unique_filepaths,
            columns: self.columns(),
        })
    }

    /// Records `[page * PAGE_SIZE, page * PAGE_SIZE + PAGE_SIZE)`, clipped to the table.
    /// Pages past the end are empty.
    pub fn page(&self, page: usize) -> Result<Vec<Row>, StorageError> {
        let offset = match page.checked_mul(PAGE_SIZE) {
            Some(offset) if offset < self.len() => offset,
            _ => return Ok(Vec::new()),
        };
        let length = PAGE_SIZE.min(self.len() - offset);
        batch_to_rows(&self.batch.slice(offset, length))
    }
}

fn read_csv(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>), StorageError> {
    let mut file = File::open(path)?;
    let format = Format::default().with_header(true);
    let (schema, _) = format.infer_schema(&mut file, Some(CSV_INFER_RECORDS))?;
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_format(format)
        .build(file)?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok((schema, batches))
}

fn read_parquet(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>), StorageError> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = Arc::clone(builder.schema());
    let batches = builder.build()?.collect::<Result<Vec<_>, _>>()?;
    Ok((schema, batches))
}

/// Holds at most one [`LookupTable`]. Loading replaces it wholesale.
#[derive(Debug, Default)]
pub struct LookupStore {
    active: RwLock<Option<Arc<LookupTable>>>,
}

impl LookupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table at `path` and make it the active table.
    ///
    /// A table missing required columns still replaces the active table and
    /// then fails with [`StorageError::Schema`]. Read and parse failures leave
    /// the previous table in place.
    pub fn load(&self, path: &str) -> Result<LookupSummary, StorageError> {
        if path.is_empty() {
            return Err(StorageError::BadRequest("No file path provided".to_string()));
        }

        let file_path = Path::new(path);
        if !file_path.exists() {
            return Err(StorageError::PathNotFound(path.to_string()));
        }

        let table = Arc::new(LookupTable::read(file_path)?);
        self.replace(Arc::clone(&table));

        let missing = table.missing_columns();
        if !missing.is_empty() {
            tracing::warn!(
                path = %path,
                missing = ?missing,
                "Loaded lookup table is missing required columns"
            );
            return Err(StorageError::Schema { missing });
        }

        let summary = table.summary()?;
        tracing::info!(
            path = %path,
            records = summary.total_records,
            filepaths = summary.unique_filepaths,
            "Loaded lookup table"
        );
        Ok(summary)
    }

    pub fn get_page(&self, page: usize) -> Result<Vec<Row>, StorageError> {
        let table = self.current().ok_or(StorageError::NoTableLoaded)?;
        table.page(page)
    }

    /// The active table, if any has been loaded.
    pub fn current(&self) -> Option<Arc<LookupTable>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, table: Arc<LookupTable>) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Some(table);
    }
}
