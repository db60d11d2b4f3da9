//! Suppliers of raw partition documents.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::SourceError;

/// Asynchronous supplier of partition documents.
///
/// A document is the combined `{"units": [...], "unitSystems": [...]}` JSON
/// text of one partition. Implementations may hit the network or disk; the
/// registry calls `fetch` at most once per successful load.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self, partition: &str) -> Result<String, SourceError>;
}

/// In-memory partition documents.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, partition: impl Into<String>, document: impl Into<String>) -> Self {
        self.insert(partition, document);
        self
    }

    pub fn insert(&mut self, partition: impl Into<String>, document: impl Into<String>) {
        self.documents.insert(partition.into(), document.into());
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    async fn fetch(&self, partition: &str) -> Result<String, SourceError> {
        self.documents
            .get(partition)
            .cloned()
            .ok_or_else(|| SourceError::PartitionNotFound {
                partition: partition.to_string(),
            })
    }
}

/// Reads `<root>/<partition>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the partition document; names that could escape the root are rejected.
    pub fn path_for(&self, partition: &str) -> Result<PathBuf, SourceError> {
        let valid = !partition.is_empty()
            && partition != "."
            && partition != ".."
            && !partition.contains(['/', '\\', '\0']);
        if !valid {
            return Err(SourceError::InvalidPartitionName {
                partition: partition.to_string(),
            });
        }
        Ok(self.root.join(format!("{partition}.json")))
    }
}

#[async_trait]
impl CatalogSource for DirectorySource {
    async fn fetch(&self, partition: &str) -> Result<String, SourceError> {
        let path = self.path_for(partition)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SourceError::PartitionNotFound {
                partition: partition.to_string(),
            }),
            Err(e) => Err(SourceError::FileRead { path, source: e }),
        }
    }
}
