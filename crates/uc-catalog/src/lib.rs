//! uc-catalog: unit catalog format, validation and lookup.
//!
//! Provides:
//! - Serialized unit and unit-system records (`schema`)
//! - Naming and provenance rules (`naming`, `validate`)
//! - Incremental partition builder with fail-fast validation
//! - Frozen lookup index (`Catalog`)
//! - The bundled global partition (`builtin`)
//!
//! # Example
//!
//! ```
//! use uc_catalog::builtin;
//!
//! let catalog = builtin::global().unwrap();
//! let celsius = catalog.unit_by_alias("Temperature", "°C").unwrap();
//! let imperial = catalog.unit_by_system(celsius, "Imperial").unwrap();
//! assert_eq!(imperial.external_id, "temperature:deg_f");
//! ```

pub mod builder;
pub mod builtin;
pub mod catalog;
pub mod error;
pub mod naming;
pub mod schema;
pub mod validate;

pub use builder::{CatalogBuilder, DEFAULT_SYSTEM, LoadOptions};
pub use catalog::Catalog;
pub use error::{CatalogError, CatalogResult};
pub use schema::*;
pub use validate::{
    DuplicateConversions, filter_equivalent, find_duplicate_conversions, validate_unit,
};
