//! Incremental catalog builder.

use std::collections::HashMap;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};
use crate::naming;
use crate::schema::{UnitDef, UnitSystemDef};
use crate::validate::validate_unit;

/// Name of the fallback unit system unless a deployment chooses otherwise.
pub const DEFAULT_SYSTEM: &str = "Default";

/// Deployment-wide load settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Unit system every other system falls back to. It must bind every
    /// quantity of the partition.
    pub default_system: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            default_system: DEFAULT_SYSTEM.to_string(),
        }
    }
}

/// Builder for one catalog partition.
///
/// Add units first, then the unit systems referring to them, then call
/// `build()` to check completeness and freeze everything into an immutable
/// [`Catalog`]. The first invalid record aborts the load.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    options: LoadOptions,
    pub(crate) units: Vec<UnitDef>,
    pub(crate) by_external_id: HashMap<String, usize>,
    pub(crate) quantities: Vec<String>,
    pub(crate) by_quantity: HashMap<String, Vec<usize>>,
    pub(crate) by_alias: HashMap<(String, String), usize>,
    pub(crate) systems: Vec<UnitSystemDef>,
    pub(crate) by_system: HashMap<String, HashMap<String, usize>>,
}

impl CatalogBuilder {
    /// Create a new empty builder.
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Parse a JSON array of units and add them in order.
    pub fn load_units(&mut self, raw: &str) -> CatalogResult<()> {
        let units: Vec<UnitDef> =
            serde_json::from_str(raw).map_err(|e| CatalogError::MalformedCatalog {
                document: "units",
                message: e.to_string(),
            })?;
        self.add_units(units)
    }

    /// Parse a JSON array of unit systems and add them in order.
    pub fn load_systems(&mut self, raw: &str) -> CatalogResult<()> {
        let systems: Vec<UnitSystemDef> =
            serde_json::from_str(raw).map_err(|e| CatalogError::MalformedCatalog {
                document: "unit systems",
                message: e.to_string(),
            })?;
        self.add_systems(systems)
    }

    pub fn add_units(&mut self, units: impl IntoIterator<Item = UnitDef>) -> CatalogResult<()> {
        for unit in units {
            self.add_unit(unit)?;
        }
        Ok(())
    }

    pub fn add_systems(
        &mut self,
        systems: impl IntoIterator<Item = UnitSystemDef>,
    ) -> CatalogResult<()> {
        for system in systems {
            self.add_system(system)?;
        }
        Ok(())
    }

    /// Validate a unit and register it in every index.
    pub fn add_unit(&mut self, unit: UnitDef) -> CatalogResult<()> {
        if self.by_external_id.contains_key(&unit.external_id) {
            return Err(CatalogError::DuplicateExternalId {
                external_id: unit.external_id,
            });
        }
        validate_unit(&unit)?;

        // One unit may list the same alias twice under different encodings
        let aliases = naming::dedup_aliases(&unit.alias_names);
        for alias in &aliases {
            let key = (unit.quantity.clone(), alias.clone());
            if let Some(&existing) = self.by_alias.get(&key) {
                return Err(CatalogError::DuplicateAlias {
                    quantity: unit.quantity,
                    alias: alias.clone(),
                    existing: self.units[existing].external_id.clone(),
                    duplicate: unit.external_id,
                });
            }
        }

        let index = self.units.len();
        for alias in aliases {
            self.by_alias
                .entry((unit.quantity.clone(), alias))
                .or_insert(index);
        }
        self.by_external_id.insert(unit.external_id.clone(), index);
        match self.by_quantity.get_mut(&unit.quantity) {
            Some(members) => members.push(index),
            None => {
                self.quantities.push(unit.quantity.clone());
                self.by_quantity.insert(unit.quantity.clone(), vec![index]);
            }
        }
        self.units.push(unit);
        Ok(())
    }

    /// Resolve a unit system's bindings against the units added so far.
    pub fn add_system(&mut self, system: UnitSystemDef) -> CatalogResult<()> {
        if self.by_system.contains_key(&system.name) {
            return Err(CatalogError::DuplicateSystem { name: system.name });
        }

        let mut bindings = HashMap::with_capacity(system.quantities.len());
        for binding in &system.quantities {
            let Some(&index) = self.by_external_id.get(&binding.unit_external_id) else {
                return Err(CatalogError::UnknownUnitReference {
                    system: system.name.clone(),
                    external_id: binding.unit_external_id.clone(),
                });
            };
            if !self.by_quantity.contains_key(&binding.name) {
                return Err(CatalogError::UnknownQuantityReference {
                    system: system.name.clone(),
                    quantity: binding.name.clone(),
                });
            }
            let unit = &self.units[index];
            if unit.quantity != binding.name {
                return Err(CatalogError::BindingQuantityMismatch {
                    system: system.name.clone(),
                    quantity: binding.name.clone(),
                    external_id: unit.external_id.clone(),
                    unit_quantity: unit.quantity.clone(),
                });
            }
            if bindings.insert(binding.name.clone(), index).is_some() {
                return Err(CatalogError::DuplicateBinding {
                    system: system.name.clone(),
                    quantity: binding.name.clone(),
                });
            }
        }

        self.by_system.insert(system.name.clone(), bindings);
        self.systems.push(system);
        Ok(())
    }

    /// Check the default system and freeze the partition.
    pub fn build(self) -> CatalogResult<Catalog> {
        let default_name = &self.options.default_system;
        let Some(defaults) = self.by_system.get(default_name) else {
            return Err(CatalogError::MissingDefaultSystem {
                name: default_name.clone(),
            });
        };

        let missing: Vec<String> = self
            .quantities
            .iter()
            .filter(|quantity| !defaults.contains_key(*quantity))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(CatalogError::IncompleteDefaultSystem {
                name: default_name.clone(),
                missing,
            });
        }

        debug!(
            units = self.units.len(),
            quantities = self.quantities.len(),
            systems = self.systems.len(),
            "catalog partition built"
        );

        Ok(Catalog {
            default_system: self.options.default_system,
            units: self.units,
            by_external_id: self.by_external_id,
            quantities: self.quantities,
            by_quantity: self.by_quantity,
            by_alias: self.by_alias,
            systems: self.systems,
            by_system: self.by_system,
        })
    }
}
