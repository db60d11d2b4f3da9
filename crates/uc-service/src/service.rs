//! Lookups and conversions scoped to a partition.

use std::sync::Arc;
use uc_catalog::{Catalog, LoadOptions, UnitDef, builtin};
use uc_convert::{ConversionKind, convert_with};
use uc_core::Real;

use crate::error::ServiceResult;
use crate::registry::PartitionRegistry;
use crate::source::CatalogSource;

/// Reserved name of the bundled global partition; it never reaches the
/// partition source.
pub const GLOBAL_PARTITION: &str = "global";

/// A converted value together with the unit it is expressed in.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemValue {
    pub unit: UnitDef,
    pub value: Real,
}

/// Entry point for catalog queries.
///
/// `partition: None` or `Some(GLOBAL_PARTITION)` addresses the bundled global
/// catalog; any other name addresses a lazily fetched partition. Partitions
/// are isolated from each other and from the global catalog.
#[derive(Debug)]
pub struct UnitService {
    registry: PartitionRegistry,
}

impl UnitService {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self::with_options(source, LoadOptions::default())
    }

    pub fn with_options(source: Arc<dyn CatalogSource>, options: LoadOptions) -> Self {
        Self {
            registry: PartitionRegistry::new(source, options),
        }
    }

    pub fn registry(&self) -> &PartitionRegistry {
        &self.registry
    }

    /// The catalog of `partition`, loading it if needed.
    pub async fn catalog(&self, partition: Option<&str>) -> ServiceResult<Arc<Catalog>> {
        match partition {
            None | Some(GLOBAL_PARTITION) => Ok(builtin::global()?),
            Some(name) => self.registry.get(name).await,
        }
    }

    pub async fn unit(&self, external_id: &str, partition: Option<&str>) -> ServiceResult<UnitDef> {
        let catalog = self.catalog(partition).await?;
        Ok(catalog.unit(external_id)?.clone())
    }

    pub async fn contains(&self, external_id: &str, partition: Option<&str>) -> ServiceResult<bool> {
        Ok(self.catalog(partition).await?.contains(external_id))
    }

    pub async fn units_by_quantity(
        &self,
        quantity: &str,
        partition: Option<&str>,
    ) -> ServiceResult<Vec<UnitDef>> {
        let catalog = self.catalog(partition).await?;
        let units = catalog.units_by_quantity(quantity)?;
        Ok(units.into_iter().cloned().collect())
    }

    pub async fn unit_by_alias(
        &self,
        quantity: &str,
        alias: &str,
        partition: Option<&str>,
    ) -> ServiceResult<UnitDef> {
        let catalog = self.catalog(partition).await?;
        Ok(catalog.unit_by_alias(quantity, alias)?.clone())
    }

    /// Canonical unit of `external_id`'s quantity under `system`.
    pub async fn unit_by_system(
        &self,
        external_id: &str,
        system: &str,
        partition: Option<&str>,
    ) -> ServiceResult<UnitDef> {
        let catalog = self.catalog(partition).await?;
        let unit = catalog.unit(external_id)?;
        Ok(catalog.unit_by_system(unit, system)?.clone())
    }

    /// Convert `value` between two units of one partition.
    pub async fn convert(
        &self,
        kind: ConversionKind,
        from: &str,
        to: &str,
        value: Real,
        partition: Option<&str>,
    ) -> ServiceResult<Real> {
        let catalog = self.catalog(partition).await?;
        let from = catalog.unit(from)?;
        let to = catalog.unit(to)?;
        Ok(convert_with(kind, from, to, value)?)
    }

    /// Convert `value` into the canonical unit of `system`.
    pub async fn convert_to_system(
        &self,
        kind: ConversionKind,
        from: &str,
        system: &str,
        value: Real,
        partition: Option<&str>,
    ) -> ServiceResult<SystemValue> {
        let catalog = self.catalog(partition).await?;
        let from = catalog.unit(from)?;
        let to = catalog.unit_by_system(from, system)?;
        Ok(SystemValue {
            unit: to.clone(),
            value: convert_with(kind, from, to, value)?,
        })
    }
}
