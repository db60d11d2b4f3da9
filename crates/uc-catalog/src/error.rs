//! Catalog load and lookup errors.

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while loading a partition or querying a loaded one.
///
/// Every variant except `NotFound` means the catalog data itself is corrupt;
/// the partition load is abandoned on the first one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Malformed {document} document: {message}")]
    MalformedCatalog {
        document: &'static str,
        message: String,
    },

    #[error("Duplicate externalId: {external_id}")]
    DuplicateExternalId { external_id: String },

    #[error("Duplicate alias '{alias}' for quantity '{quantity}': used by {existing} and {duplicate}")]
    DuplicateAlias {
        quantity: String,
        alias: String,
        existing: String,
        duplicate: String,
    },

    #[error("Duplicate unit system: {name}")]
    DuplicateSystem { name: String },

    #[error("Invalid externalId for unit '{name}' of quantity '{quantity}': expected '{expected}', found '{actual}'")]
    InvalidExternalId {
        name: String,
        quantity: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid sourceReference for unit '{name}' of quantity '{quantity}': {reason}")]
    InvalidSourceReference {
        name: String,
        quantity: String,
        reason: String,
    },

    #[error("Inconsistent source for unit '{name}' of quantity '{quantity}': source is {source_tag:?} but sourceReference is {reference:?}")]
    InconsistentQudtSource {
        name: String,
        quantity: String,
        source_tag: Option<String>,
        reference: Option<String>,
    },

    #[error("Invalid conversion for unit '{name}' of quantity '{quantity}': {reason}")]
    InvalidConversion {
        name: String,
        quantity: String,
        reason: String,
    },

    #[error("Unit system '{system}' references unknown unit '{external_id}'")]
    UnknownUnitReference { system: String, external_id: String },

    #[error("Unit system '{system}' references unknown quantity '{quantity}'")]
    UnknownQuantityReference { system: String, quantity: String },

    #[error("Unit system '{system}' binds quantity '{quantity}' more than once")]
    DuplicateBinding { system: String, quantity: String },

    #[error("Unit system '{system}' binds quantity '{quantity}' to '{external_id}' of quantity '{unit_quantity}'")]
    BindingQuantityMismatch {
        system: String,
        quantity: String,
        external_id: String,
        unit_quantity: String,
    },

    #[error("Missing default unit system '{name}'")]
    MissingDefaultSystem { name: String },

    #[error("Default unit system '{name}' has no unit for quantities: {}", .missing.join(", "))]
    IncompleteDefaultSystem { name: String, missing: Vec<String> },

    #[error("Unknown {what}: '{key}'{}", suggestion_suffix(.suggestions))]
    NotFound {
        what: &'static str,
        key: String,
        suggestions: Vec<String>,
    },
}

impl CatalogError {
    pub fn not_found(what: &'static str, key: impl Into<String>) -> Self {
        CatalogError::NotFound {
            what,
            key: key.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestions(mut self, similar: Vec<String>) -> Self {
        if let CatalogError::NotFound { suggestions, .. } = &mut self {
            *suggestions = similar;
        }
        self
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

fn suggestion_suffix(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (similar: {})", suggestions.join(", "))
    }
}
