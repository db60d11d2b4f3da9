//! Unit validation and duplicate-conversion review.

use crate::error::{CatalogError, CatalogResult};
use crate::naming::{self, QUDT_SOURCE};
use crate::schema::{Conversion, UnitDef};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use uc_core::ensure_finite;

/// Units of one quantity grouped by identical conversion.
pub type DuplicateConversions = BTreeMap<String, HashMap<Conversion, Vec<UnitDef>>>;

/// Check one unit's naming and provenance conventions.
pub fn validate_unit(unit: &UnitDef) -> CatalogResult<()> {
    validate_external_id(unit)?;
    validate_source_reference(unit)?;
    validate_conversion(unit)?;
    Ok(())
}

fn validate_external_id(unit: &UnitDef) -> CatalogResult<()> {
    let expected = naming::expected_external_id(&unit.quantity, &unit.name);
    if unit.external_id != expected || !naming::is_well_formed_external_id(&unit.external_id) {
        return Err(CatalogError::InvalidExternalId {
            name: unit.name.clone(),
            quantity: unit.quantity.clone(),
            expected,
            actual: unit.external_id.clone(),
        });
    }
    Ok(())
}

fn validate_source_reference(unit: &UnitDef) -> CatalogResult<()> {
    let is_qudt_source = unit.source.as_deref() == Some(QUDT_SOURCE);
    let mentions_qudt = unit
        .source_reference
        .as_deref()
        .is_some_and(|reference| reference.contains("qudt"));

    if is_qudt_source {
        let expected = naming::qudt_reference(&unit.name);
        if unit.source_reference.as_deref() != Some(expected.as_str()) {
            return Err(CatalogError::InvalidSourceReference {
                name: unit.name.clone(),
                quantity: unit.quantity.clone(),
                reason: format!(
                    "expected '{}', found {:?}",
                    expected, unit.source_reference
                ),
            });
        }
    } else if let Some(reference) = &unit.source_reference {
        if !naming::is_http_url(reference) {
            return Err(CatalogError::InvalidSourceReference {
                name: unit.name.clone(),
                quantity: unit.quantity.clone(),
                reason: format!("'{}' is not an absolute http(s) URL", reference),
            });
        }
    }

    if is_qudt_source != mentions_qudt {
        return Err(CatalogError::InconsistentQudtSource {
            name: unit.name.clone(),
            quantity: unit.quantity.clone(),
            source_tag: unit.source.clone(),
            reference: unit.source_reference.clone(),
        });
    }

    Ok(())
}

fn validate_conversion(unit: &UnitDef) -> CatalogResult<()> {
    let invalid = |reason: String| CatalogError::InvalidConversion {
        name: unit.name.clone(),
        quantity: unit.quantity.clone(),
        reason,
    };

    let multiplier = ensure_finite(unit.conversion.multiplier, "conversion multiplier")
        .map_err(|e| invalid(e.to_string()))?;
    ensure_finite(unit.conversion.offset, "conversion offset").map_err(|e| invalid(e.to_string()))?;
    if multiplier == 0.0 {
        return Err(invalid("multiplier must be non-zero".to_string()));
    }
    Ok(())
}

/// Group units by quantity, then by identical conversion, keeping only groups
/// with at least two members.
///
/// Such groups are either accidental duplicates or units that are
/// intentionally equivalent; telling them apart is up to the caller (see
/// [`filter_equivalent`]).
pub fn find_duplicate_conversions<'a, I>(units: I) -> DuplicateConversions
where
    I: IntoIterator<Item = &'a UnitDef>,
{
    let mut grouped: BTreeMap<String, HashMap<Conversion, Vec<UnitDef>>> = BTreeMap::new();
    for unit in units {
        grouped
            .entry(unit.quantity.clone())
            .or_default()
            .entry(unit.conversion)
            .or_default()
            .push(unit.clone());
    }

    grouped
        .into_iter()
        .filter_map(|(quantity, by_conversion)| {
            let duplicates: HashMap<Conversion, Vec<UnitDef>> = by_conversion
                .into_iter()
                .filter(|(_, units)| units.len() >= 2)
                .collect();
            (!duplicates.is_empty()).then_some((quantity, duplicates))
        })
        .collect()
}

/// Drop duplicate groups whose members are all listed together in one of the
/// `equivalents` sets of externalIds; what remains needs review.
pub fn filter_equivalent(
    duplicates: DuplicateConversions,
    equivalents: &[BTreeSet<String>],
) -> DuplicateConversions {
    duplicates
        .into_iter()
        .filter_map(|(quantity, groups)| {
            let residual: HashMap<Conversion, Vec<UnitDef>> = groups
                .into_iter()
                .filter(|(_, units)| {
                    !equivalents.iter().any(|known| {
                        units.iter().all(|unit| known.contains(&unit.external_id))
                    })
                })
                .collect();
            (!residual.is_empty()).then_some((quantity, residual))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(quantity: &str, name: &str, multiplier: f64, offset: f64) -> UnitDef {
        UnitDef {
            external_id: naming::expected_external_id(quantity, name),
            name: name.to_string(),
            long_name: name.to_lowercase(),
            symbol: None,
            alias_names: vec![],
            quantity: quantity.to_string(),
            conversion: Conversion::new(multiplier, offset),
            source: None,
            source_reference: None,
        }
    }

    fn qudt(quantity: &str, name: &str, multiplier: f64, offset: f64) -> UnitDef {
        UnitDef {
            source: Some(QUDT_SOURCE.to_string()),
            source_reference: Some(naming::qudt_reference(name)),
            ..unit(quantity, name, multiplier, offset)
        }
    }

    #[test]
    fn valid_units_pass() {
        validate_unit(&unit("Length", "M", 1.0, 0.0)).unwrap();
        validate_unit(&qudt("Temperature", "DEG_C", 1.0, 273.15)).unwrap();

        let mut custom = unit("Dimensionless Ratio", "PPM", 1e-6, 0.0);
        custom.source = Some("custom".into());
        custom.source_reference = Some("https://en.wikipedia.org/wiki/Parts-per_notation".into());
        validate_unit(&custom).unwrap();
    }

    #[test]
    fn external_id_must_match_quantity_and_name() {
        let mut bad = unit("Temperature", "DEG_C", 1.0, 273.15);
        bad.external_id = "temperature:celsius".into();
        match validate_unit(&bad).unwrap_err() {
            CatalogError::InvalidExternalId {
                name,
                quantity,
                expected,
                ..
            } => {
                assert_eq!(name, "DEG_C");
                assert_eq!(quantity, "Temperature");
                assert_eq!(expected, "temperature:deg_c");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn qudt_units_need_exact_reference() {
        let mut bad = qudt("Length", "FT", 0.3048, 0.0);
        bad.source_reference = Some("https://qudt.org/vocab/unit/FOOT".into());
        assert!(matches!(
            validate_unit(&bad),
            Err(CatalogError::InvalidSourceReference { .. })
        ));

        bad.source_reference = None;
        assert!(matches!(
            validate_unit(&bad),
            Err(CatalogError::InvalidSourceReference { .. })
        ));
    }

    #[test]
    fn non_qudt_reference_must_be_a_url() {
        let mut bad = unit("Length", "FT", 0.3048, 0.0);
        bad.source_reference = Some("not a url".into());
        assert!(matches!(
            validate_unit(&bad),
            Err(CatalogError::InvalidSourceReference { .. })
        ));
    }

    #[test]
    fn qudt_reference_requires_qudt_source() {
        let mut bad = unit("Length", "FT", 0.3048, 0.0);
        bad.source_reference = Some("https://qudt.org/vocab/unit/FT".into());
        assert!(matches!(
            validate_unit(&bad),
            Err(CatalogError::InconsistentQudtSource { .. })
        ));
    }

    #[test]
    fn zero_or_non_finite_multiplier_is_rejected() {
        assert!(matches!(
            validate_unit(&unit("Length", "NOTHING", 0.0, 0.0)),
            Err(CatalogError::InvalidConversion { .. })
        ));
        assert!(matches!(
            validate_unit(&unit("Length", "HUGE", f64::INFINITY, 0.0)),
            Err(CatalogError::InvalidConversion { .. })
        ));
        assert!(matches!(
            validate_unit(&unit("Length", "SHIFTED", 1.0, f64::NAN)),
            Err(CatalogError::InvalidConversion { .. })
        ));
    }

    #[test]
    fn duplicates_grouped_by_quantity_and_conversion() {
        let units = vec![
            unit("Length", "M", 1.0, 0.0),
            unit("Length", "METER", 1.0, 0.0),
            unit("Length", "FT", 0.3048, 0.0),
            unit("Mass", "KiloGM", 1.0, 0.0),
            unit("Dimensionless Ratio", "PERCENT", 0.01, 0.0),
            unit("Dimensionless Ratio", "PCT", 0.01, 0.0),
            unit("Dimensionless Ratio", "PERCENT_ALT", 0.01, 0.0),
        ];

        let duplicates = find_duplicate_conversions(&units);
        assert_eq!(duplicates.len(), 2);
        assert!(!duplicates.contains_key("Mass"));

        let length = &duplicates["Length"][&Conversion::IDENTITY];
        let ids: Vec<&str> = length.iter().map(|u| u.external_id.as_str()).collect();
        assert_eq!(ids, vec!["length:m", "length:meter"]);

        let ratio = &duplicates["Dimensionless Ratio"][&Conversion::new(0.01, 0.0)];
        assert_eq!(ratio.len(), 3);
    }

    #[test]
    fn equivalents_filter_known_groups() {
        let units = vec![
            unit("Length", "M", 1.0, 0.0),
            unit("Length", "METER", 1.0, 0.0),
            unit("Mass", "KiloGM", 1.0, 0.0),
            unit("Mass", "KG", 1.0, 0.0),
        ];
        let known: BTreeSet<String> = ["length:m", "length:meter"]
            .into_iter()
            .map(String::from)
            .collect();

        let residual = filter_equivalent(find_duplicate_conversions(&units), &[known]);
        assert_eq!(residual.len(), 1);
        assert!(residual.contains_key("Mass"));
    }
}
