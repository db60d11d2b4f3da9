//! Frozen lookup index over one catalog partition.

use std::collections::{HashMap, HashSet};

use crate::builder::{CatalogBuilder, LoadOptions};
use crate::error::{CatalogError, CatalogResult};
use crate::naming;
use crate::schema::{PartitionDocument, UnitDef, UnitSystemDef};

const MAX_SUGGESTIONS: usize = 5;

/// Immutable, validated partition of units and unit systems.
///
/// All views index the same unit list and are only ever filled by
/// [`CatalogBuilder`], so they cannot disagree.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub(crate) default_system: String,
    pub(crate) units: Vec<UnitDef>,
    pub(crate) by_external_id: HashMap<String, usize>,
    /// Quantities in order of first appearance.
    pub(crate) quantities: Vec<String>,
    pub(crate) by_quantity: HashMap<String, Vec<usize>>,
    /// (quantity, NFC alias) -> unit
    pub(crate) by_alias: HashMap<(String, String), usize>,
    pub(crate) systems: Vec<UnitSystemDef>,
    /// system -> quantity -> unit
    pub(crate) by_system: HashMap<String, HashMap<String, usize>>,
}

impl Catalog {
    /// Load a partition from its units and unit-systems JSON documents.
    pub fn from_json(units: &str, systems: &str, options: &LoadOptions) -> CatalogResult<Self> {
        let mut builder = CatalogBuilder::new(options.clone());
        builder.load_units(units)?;
        builder.load_systems(systems)?;
        builder.build()
    }

    /// Load a partition from a combined `{"units": [...], "unitSystems": [...]}` document.
    pub fn from_document(raw: &str, options: &LoadOptions) -> CatalogResult<Self> {
        let document: PartitionDocument =
            serde_json::from_str(raw).map_err(|e| CatalogError::MalformedCatalog {
                document: "partition",
                message: e.to_string(),
            })?;
        Self::from_defs(document.units, document.unit_systems, options)
    }

    pub fn from_defs(
        units: Vec<UnitDef>,
        systems: Vec<UnitSystemDef>,
        options: &LoadOptions,
    ) -> CatalogResult<Self> {
        let mut builder = CatalogBuilder::new(options.clone());
        builder.add_units(units)?;
        builder.add_systems(systems)?;
        builder.build()
    }

    pub fn default_system_name(&self) -> &str {
        &self.default_system
    }

    /// All units in load order.
    pub fn units(&self) -> &[UnitDef] {
        &self.units
    }

    /// Distinct quantities in order of first appearance.
    pub fn quantities(&self) -> &[String] {
        &self.quantities
    }

    pub fn systems(&self) -> &[UnitSystemDef] {
        &self.systems
    }

    pub fn contains(&self, external_id: &str) -> bool {
        self.by_external_id.contains_key(external_id)
    }

    pub fn unit(&self, external_id: &str) -> CatalogResult<&UnitDef> {
        self.by_external_id
            .get(external_id)
            .map(|&index| &self.units[index])
            .ok_or_else(|| {
                CatalogError::not_found("unit", external_id).with_suggestions(similar(
                    external_id,
                    self.units.iter().map(|u| u.external_id.as_str()),
                ))
            })
    }

    /// Units of `quantity` in load order.
    pub fn units_by_quantity(&self, quantity: &str) -> CatalogResult<Vec<&UnitDef>> {
        let members = self.quantity_members(quantity)?;
        Ok(members.iter().map(|&index| &self.units[index]).collect())
    }

    pub fn unit_by_alias(&self, quantity: &str, alias: &str) -> CatalogResult<&UnitDef> {
        let members = self.quantity_members(quantity)?;
        let key = (quantity.to_string(), naming::normalize_alias(alias));
        match self.by_alias.get(&key) {
            Some(&index) => Ok(&self.units[index]),
            None => {
                let aliases = members
                    .iter()
                    .flat_map(|&index| self.units[index].alias_names.iter())
                    .map(String::as_str);
                Err(CatalogError::not_found("alias", alias).with_suggestions(similar(alias, aliases)))
            }
        }
    }

    /// Every unit carrying `alias`, whatever its quantity.
    pub fn units_by_alias(&self, alias: &str) -> CatalogResult<Vec<&UnitDef>> {
        let alias = naming::normalize_alias(alias);
        let found: Vec<&UnitDef> = self
            .quantities
            .iter()
            .filter_map(|quantity| self.by_alias.get(&(quantity.clone(), alias.clone())))
            .map(|&index| &self.units[index])
            .collect();
        if found.is_empty() {
            let aliases = self
                .units
                .iter()
                .flat_map(|u| u.alias_names.iter())
                .map(String::as_str);
            return Err(
                CatalogError::not_found("alias", alias.as_str()).with_suggestions(similar(&alias, aliases))
            );
        }
        Ok(found)
    }

    pub fn system(&self, name: &str) -> CatalogResult<&UnitSystemDef> {
        self.systems
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| self.unknown_system(name))
    }

    /// Canonical unit for `unit`'s quantity under `system`, falling back to the
    /// default system when `system` has no binding for that quantity.
    pub fn unit_by_system(&self, unit: &UnitDef, system: &str) -> CatalogResult<&UnitDef> {
        let Some(bindings) = self.by_system.get(system) else {
            return Err(self.unknown_system(system));
        };

        let index = bindings.get(&unit.quantity).or_else(|| {
            self.by_system
                .get(&self.default_system)
                .and_then(|defaults| defaults.get(&unit.quantity))
        });

        match index {
            Some(&index) => Ok(&self.units[index]),
            None => Err(CatalogError::not_found("quantity", unit.quantity.as_str())),
        }
    }

    fn unknown_system(&self, name: &str) -> CatalogError {
        CatalogError::not_found("unit system", name)
            .with_suggestions(similar(name, self.systems.iter().map(|s| s.name.as_str())))
    }

    fn quantity_members(&self, quantity: &str) -> CatalogResult<&[usize]> {
        self.by_quantity
            .get(quantity)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                CatalogError::not_found("quantity", quantity).with_suggestions(similar(
                    quantity,
                    self.quantities.iter().map(String::as_str),
                ))
            })
    }
}

/// Candidates resembling `query`, most similar first.
fn similar<'a>(query: &str, candidates: impl Iterator<Item = &'a str>) -> Vec<String> {
    let query = query.to_lowercase();
    let mut seen = HashSet::new();
    let mut scored: Vec<(usize, String)> = candidates
        .filter(|candidate| seen.insert(*candidate))
        .filter_map(|candidate| {
            let score = similarity_score(&query, &candidate.to_lowercase());
            (score > 0).then(|| (score, candidate.to_string()))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate)
        .collect()
}

fn similarity_score(query: &str, candidate: &str) -> usize {
    let mut score = 0;

    if candidate.starts_with(query) {
        score += 100;
    } else if candidate.contains(query) {
        score += 50;
    } else if query.contains(candidate) {
        score += 30;
    }

    let query_chars: HashSet<char> = query.chars().collect();
    let candidate_chars: HashSet<char> = candidate.chars().collect();
    let common = query_chars.intersection(&candidate_chars).count();

    // Sharing a few letters is not enough on its own
    if score == 0 && common * 2 < query_chars.len().max(candidate_chars.len()) {
        return 0;
    }
    score += common * 2;

    let len_diff = query.len().abs_diff(candidate.len());
    if len_diff < 5 && score > 0 {
        score += 5 - len_diff;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNITS: &str = r#"[
        {"externalId": "length:m", "name": "M", "longName": "metre",
         "aliasNames": ["m", "meter", "metre"], "quantity": "Length",
         "conversion": {"multiplier": 1.0, "offset": 0.0}},
        {"externalId": "length:ft", "name": "FT", "longName": "foot",
         "aliasNames": ["ft", "feet", "foot"], "quantity": "Length",
         "conversion": {"multiplier": 0.3048, "offset": 0.0}},
        {"externalId": "time:min", "name": "MIN", "longName": "minute",
         "aliasNames": ["min", "m"], "quantity": "Time",
         "conversion": {"multiplier": 60.0, "offset": 0.0}},
        {"externalId": "time:sec", "name": "SEC", "longName": "second",
         "aliasNames": ["s", "sec"], "quantity": "Time",
         "conversion": {"multiplier": 1.0, "offset": 0.0}}
    ]"#;

    const SYSTEMS: &str = r#"[
        {"name": "Default", "quantities": [
            {"name": "Length", "unitExternalId": "length:m"},
            {"name": "Time", "unitExternalId": "time:sec"}]},
        {"name": "Imperial", "quantities": [
            {"name": "Length", "unitExternalId": "length:ft"}]}
    ]"#;

    fn catalog() -> Catalog {
        Catalog::from_json(UNITS, SYSTEMS, &LoadOptions::default()).unwrap()
    }

    #[test]
    fn lookup_by_external_id() {
        let catalog = catalog();
        assert_eq!(catalog.unit("length:ft").unwrap().long_name, "foot");
        assert!(catalog.contains("time:min"));
        assert!(!catalog.contains("time:hr"));

        let err = catalog.unit("length:foot").unwrap_err();
        match err {
            CatalogError::NotFound { what, key, suggestions } => {
                assert_eq!(what, "unit");
                assert_eq!(key, "length:foot");
                assert_eq!(suggestions.first().map(String::as_str), Some("length:ft"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lookup_by_quantity_keeps_load_order() {
        let catalog = catalog();
        let ids: Vec<&str> = catalog
            .units_by_quantity("Length")
            .unwrap()
            .iter()
            .map(|u| u.external_id.as_str())
            .collect();
        assert_eq!(ids, vec!["length:m", "length:ft"]);
        assert_eq!(catalog.quantities(), &["Length".to_string(), "Time".to_string()]);
        assert!(catalog.units_by_quantity("Mass").unwrap_err().is_not_found());
    }

    #[test]
    fn lookup_by_alias_is_scoped_to_quantity() {
        let catalog = catalog();
        assert_eq!(
            catalog.unit_by_alias("Length", "m").unwrap().external_id,
            "length:m"
        );
        assert_eq!(
            catalog.unit_by_alias("Time", "m").unwrap().external_id,
            "time:min"
        );
        assert!(catalog.unit_by_alias("Length", "s").unwrap_err().is_not_found());
        assert!(catalog.unit_by_alias("Lenght", "m").unwrap_err().is_not_found());

        let all: Vec<&str> = catalog
            .units_by_alias("m")
            .unwrap()
            .iter()
            .map(|u| u.external_id.as_str())
            .collect();
        assert_eq!(all, vec!["length:m", "time:min"]);
        assert!(catalog.units_by_alias("parsec").unwrap_err().is_not_found());
    }

    #[test]
    fn system_lookup_falls_back_to_default() {
        let catalog = catalog();
        let metre = catalog.unit("length:m").unwrap();
        let minute = catalog.unit("time:min").unwrap();

        assert_eq!(
            catalog.unit_by_system(metre, "Imperial").unwrap().external_id,
            "length:ft"
        );
        assert_eq!(
            catalog.unit_by_system(minute, "Imperial").unwrap().external_id,
            "time:sec"
        );
        assert_eq!(
            catalog.unit_by_system(minute, "Default").unwrap().external_id,
            "time:sec"
        );

        let err = catalog.unit_by_system(metre, "Metric").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { what: "unit system", .. }));
    }

    #[test]
    fn combined_document_loads() {
        let raw = format!(r#"{{"units": {UNITS}, "unitSystems": {SYSTEMS}}}"#);
        let catalog = Catalog::from_document(&raw, &LoadOptions::default()).unwrap();
        assert_eq!(catalog.units().len(), 4);
        assert_eq!(catalog.systems().len(), 2);
        assert_eq!(catalog.system("Imperial").unwrap().quantities.len(), 1);

        let err = Catalog::from_document(UNITS, &LoadOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MalformedCatalog { document: "partition", .. }
        ));
    }

    #[test]
    fn similarity_prefers_prefix_matches() {
        let found = similar("len", ["Length", "Time", "Mass"].into_iter());
        assert_eq!(found, vec!["Length".to_string()]);
        assert!(similar("zzz", ["Length", "Time"].into_iter()).is_empty());
    }
}
