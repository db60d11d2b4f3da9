//! Global partition built from the catalog data shipped with the crate.

use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

use crate::builder::LoadOptions;
use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};

pub const UNITS_JSON: &str = include_str!("../data/units.json");
pub const UNIT_SYSTEMS_JSON: &str = include_str!("../data/unit_systems.json");
pub const EQUIVALENT_UNITS_JSON: &str = include_str!("../data/equivalent_units.json");

static GLOBAL: LazyLock<CatalogResult<Arc<Catalog>>> = LazyLock::new(|| {
    Catalog::from_json(UNITS_JSON, UNIT_SYSTEMS_JSON, &LoadOptions::default()).map(Arc::new)
});

/// The global partition, loaded on first access and shared afterwards.
///
/// A broken bundled catalog yields the same error on every call.
pub fn global() -> CatalogResult<Arc<Catalog>> {
    GLOBAL.as_ref().map(Arc::clone).map_err(Clone::clone)
}

/// Groups of bundled units known to share a conversion on purpose.
pub fn equivalent_units() -> CatalogResult<Vec<BTreeSet<String>>> {
    parse_equivalents(EQUIVALENT_UNITS_JSON)
}

/// Parse a JSON array of externalId arrays.
pub fn parse_equivalents(raw: &str) -> CatalogResult<Vec<BTreeSet<String>>> {
    serde_json::from_str(raw).map_err(|e| CatalogError::MalformedCatalog {
        document: "equivalent units",
        message: e.to_string(),
    })
}
