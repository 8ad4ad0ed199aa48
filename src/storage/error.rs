use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0}")]
    BadRequest(String),
    #[error("File does not exist: {0}")]
    PathNotFound(String),
    #[error("{0}")]
    NotFound(String),
    #[error("File must be CSV or Parquet")]
    UnsupportedFormat,
    #[error("Missing columns: {missing:?}")]
    Schema { missing: Vec<String> },
    #[error("No lookup file loaded")]
    NoTableLoaded,
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Parse(String),
    #[error("{0}")]
    Arrow(Box<arrow::error::ArrowError>),
    #[error("{0}")]
    Parquet(Box<parquet::errors::ParquetError>),
    #[error("{0}")]
    Hdf5(Box<hdf5::Error>),
}

impl From<arrow::error::ArrowError> for StorageError {
    fn from(e: arrow::error::ArrowError) -> Self {
        StorageError::Arrow(Box::new(e))
    }
}

impl From<parquet::errors::ParquetError> for StorageError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        StorageError::Parquet(Box::new(e))
    }
}

impl From<hdf5::Error> for StorageError {
    fn from(e: hdf5::Error) -> Self {
        StorageError::Hdf5(Box::new(e))
    }
}

impl From<tokio::task::JoinError> for StorageError {
    fn from(e: tokio::task::JoinError) -> Self {
        StorageError::Io(std::io::Error::other(e))
    }
}
