//! Integration tests for the bundled global catalog.

use std::collections::HashSet;
use uc_catalog::{
    Catalog, LoadOptions, builtin, filter_equivalent, find_duplicate_conversions,
};

#[test]
fn bundled_catalog_loads() {
    let catalog = builtin::global().unwrap();

    assert!(catalog.units().len() > 40);
    assert_eq!(catalog.default_system_name(), "Default");
    let systems: Vec<&str> = catalog.systems().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(systems, vec!["Default", "SI", "Imperial"]);
}

#[test]
fn global_partition_is_shared() {
    let a = builtin::global().unwrap();
    let b = builtin::global().unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}

#[test]
fn every_quantity_has_a_default_unit() {
    let catalog = builtin::global().unwrap();
    for quantity in catalog.quantities() {
        let first = catalog.units_by_quantity(quantity).unwrap()[0];
        let canonical = catalog
            .unit_by_system(first, "Default")
            .unwrap_or_else(|e| panic!("no default unit for {quantity}: {e}"));
        assert_eq!(&canonical.quantity, quantity);
    }
}

#[test]
fn external_ids_are_unique() {
    let catalog = builtin::global().unwrap();
    let mut seen = HashSet::new();
    for unit in catalog.units() {
        assert!(
            seen.insert(unit.external_id.as_str()),
            "duplicate external id: {}",
            unit.external_id
        );
    }
}

#[test]
fn celsius_aliases_resolve() {
    let catalog = builtin::global().unwrap();
    for alias in ["°C", "C", "degC", "Celsius"] {
        assert_eq!(
            catalog
                .unit_by_alias("Temperature", alias)
                .unwrap()
                .external_id,
            "temperature:deg_c"
        );
    }
}

#[test]
fn decomposed_aliases_match_precomposed_entries() {
    let catalog = builtin::global().unwrap();
    // Stored precomposed (U+00C5, U+00F6); looked up decomposed or via the
    // ANGSTROM SIGN, all of which normalize to the stored form
    for alias in [
        "\u{c5}",
        "A\u{30a}",
        "\u{212b}",
        "A\u{30a}ngstro\u{308}m",
        "\u{c5}ngstr\u{f6}m",
    ] {
        assert_eq!(
            catalog.unit_by_alias("Length", alias).unwrap().external_id,
            "length:angstrom",
            "alias {alias:?}"
        );
    }
    let across = catalog.units_by_alias("A\u{30a}").unwrap();
    assert_eq!(across.len(), 1);
    assert_eq!(across[0].external_id, "length:angstrom");
}

#[test]
fn imperial_percent_falls_back_to_default() {
    let catalog = builtin::global().unwrap();
    let percent = catalog.unit("dimensionless_ratio:percent").unwrap();

    let imperial = catalog.unit_by_system(percent, "Imperial").unwrap();
    let default = catalog.unit_by_system(percent, "Default").unwrap();
    assert_eq!(imperial, default);
    assert_eq!(imperial.external_id, "dimensionless_ratio:unitless");
}

#[test]
fn imperial_has_explicit_bindings() {
    let catalog = builtin::global().unwrap();
    let metre = catalog.unit("length:m").unwrap();
    assert_eq!(
        catalog.unit_by_system(metre, "Imperial").unwrap().external_id,
        "length:ft"
    );
    let bar = catalog.unit("pressure:bar").unwrap();
    assert_eq!(
        catalog.unit_by_system(bar, "SI").unwrap().external_id,
        "pressure:bar"
    );
}

#[test]
fn unknown_keys_are_not_found() {
    let catalog = builtin::global().unwrap();
    let metre = catalog.unit("length:m").unwrap();

    assert!(catalog.unit("length:parsec").unwrap_err().is_not_found());
    assert!(catalog.units_by_quantity("Luminosity").unwrap_err().is_not_found());
    assert!(catalog.unit_by_alias("Length", "parsec").unwrap_err().is_not_found());
    assert!(catalog.unit_by_system(metre, "Nautical").unwrap_err().is_not_found());
    assert!(catalog.system("Nautical").unwrap_err().is_not_found());
}

#[test]
fn known_equivalent_units_cover_all_duplicates() {
    let catalog = builtin::global().unwrap();
    let duplicates = find_duplicate_conversions(catalog.units());
    assert!(duplicates.contains_key("Pressure"));

    let equivalents = builtin::equivalent_units().unwrap();
    let residual = filter_equivalent(duplicates, &equivalents);
    assert!(residual.is_empty(), "unreviewed duplicates: {residual:?}");
}

#[test]
fn bundled_documents_need_their_default_name() {
    // The bundled data names its fallback system "Default"
    let err = Catalog::from_json(
        builtin::UNITS_JSON,
        builtin::UNIT_SYSTEMS_JSON,
        &LoadOptions {
            default_system: "default".into(),
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        uc_catalog::CatalogError::MissingDefaultSystem { .. }
    ));
}
