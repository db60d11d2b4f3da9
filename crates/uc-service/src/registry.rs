//! Lazily loaded catalog partitions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;
use tracing::{info, warn};
use uc_catalog::{Catalog, LoadOptions};

use crate::error::ServiceResult;
use crate::source::CatalogSource;

type PartitionCell = Arc<OnceCell<Arc<Catalog>>>;

/// Cache of partitions fetched from a [`CatalogSource`].
///
/// Each partition name owns one cell. Callers racing on an empty cell all
/// await the same fetch; once filled, the cell is never written again. A
/// failed fetch or load drops the empty cell so unknown names are not
/// retained, and the next caller retries with a fresh one.
pub struct PartitionRegistry {
    source: Arc<dyn CatalogSource>,
    options: LoadOptions,
    partitions: Mutex<HashMap<String, PartitionCell>>,
}

impl PartitionRegistry {
    pub fn new(source: Arc<dyn CatalogSource>, options: LoadOptions) -> Self {
        Self {
            source,
            options,
            partitions: Mutex::new(HashMap::new()),
        }
    }

    /// The loaded partition, fetching and validating it on first use.
    pub async fn get(&self, partition: &str) -> ServiceResult<Arc<Catalog>> {
        let cell = self.cell(partition);
        match cell.get_or_try_init(|| self.load(partition)).await {
            Ok(catalog) => Ok(Arc::clone(catalog)),
            Err(e) => {
                self.evict(partition, &cell);
                Err(e)
            }
        }
    }

    pub fn is_loaded(&self, partition: &str) -> bool {
        self.lock()
            .get(partition)
            .is_some_and(|cell| cell.initialized())
    }

    /// Names of the partitions loaded so far, sorted.
    pub fn loaded(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .lock()
            .iter()
            .filter(|(_, cell)| cell.initialized())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    fn cell(&self, partition: &str) -> PartitionCell {
        let mut partitions = self.lock();
        Arc::clone(partitions.entry(partition.to_string()).or_default())
    }

    /// Forget `partition` if it still maps to the empty `cell`; a cell another
    /// caller has since filled or replaced stays.
    fn evict(&self, partition: &str, cell: &PartitionCell) {
        let mut partitions = self.lock();
        let stale = partitions
            .get(partition)
            .is_some_and(|current| Arc::ptr_eq(current, cell) && !current.initialized());
        if stale {
            partitions.remove(partition);
        }
    }

    // The map is only touched for short insert/lookup sections, so a poisoned
    // lock still holds a consistent map.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, PartitionCell>> {
        self.partitions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn load(&self, partition: &str) -> ServiceResult<Arc<Catalog>> {
        info!(partition, "Fetching catalog partition");

        let raw = self.source.fetch(partition).await.inspect_err(|e| {
            warn!(partition, error = %e, "Failed to fetch catalog partition");
        })?;

        let catalog = Catalog::from_document(&raw, &self.options).inspect_err(|e| {
            warn!(partition, error = %e, "Rejected catalog partition");
        })?;

        info!(
            partition,
            units = catalog.units().len(),
            systems = catalog.systems().len(),
            "Loaded catalog partition"
        );
        Ok(Arc::new(catalog))
    }
}

impl std::fmt::Debug for PartitionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartitionRegistry")
            .field("options", &self.options)
            .field("loaded", &self.loaded())
            .finish_non_exhaustive()
    }
}
