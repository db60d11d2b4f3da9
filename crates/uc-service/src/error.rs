//! Error types for the uc-service layer.

use std::path::PathBuf;
use uc_catalog::CatalogError;
use uc_convert::ConvertError;

/// Failure to produce the raw document of a partition.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Partition not found: {partition}")]
    PartitionNotFound { partition: String },

    #[error("Invalid partition name: {partition:?}")]
    InvalidPartitionName { partition: String },

    #[error("Failed to read partition file: {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Partition source error: {message}")]
    Backend { message: String },
}

/// Service error type wrapping the catalog, conversion and source errors.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Catalog review failed: {0}")]
    Validation(String),
}

impl ServiceError {
    /// True when a lookup key was absent, as opposed to a load failure.
    pub fn is_not_found(&self) -> bool {
        match self {
            ServiceError::Catalog(err) => err.is_not_found(),
            ServiceError::Source(SourceError::PartitionNotFound { .. }) => true,
            _ => false,
        }
    }
}

/// Result type for uc-service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
