//! Catalog schema definitions.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Affine map from a unit's value to the shared base representation of its
/// quantity: `base = (value + offset) * multiplier`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Conversion {
    pub multiplier: f64,
    pub offset: f64,
}

impl Conversion {
    pub const IDENTITY: Conversion = Conversion {
        multiplier: 1.0,
        offset: 0.0,
    };

    pub fn new(multiplier: f64, offset: f64) -> Self {
        Self { multiplier, offset }
    }

    fn key(&self) -> (u64, u64) {
        // -0.0 and 0.0 describe the same scale
        let fold = |v: f64| if v == 0.0 { 0.0_f64 } else { v };
        (fold(self.multiplier).to_bits(), fold(self.offset).to_bits())
    }
}

impl PartialEq for Conversion {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Conversion {}

impl Hash for Conversion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UnitDef {
    pub external_id: String,
    pub name: String,
    pub long_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub alias_names: Vec<String>,
    pub quantity: String,
    pub conversion: Conversion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuantityBindingDef {
    pub name: String,
    pub unit_external_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnitSystemDef {
    pub name: String,
    #[serde(default)]
    pub quantities: Vec<QuantityBindingDef>,
}

/// Everything one partition needs, as delivered by a partition data source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartitionDocument {
    pub units: Vec<UnitDef>,
    pub unit_systems: Vec<UnitSystemDef>,
}
