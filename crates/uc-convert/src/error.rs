//! Conversion errors.

use thiserror::Error;

/// Result type for conversions.
pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// The two units measure different quantities.
    #[error("Cannot convert from '{from}' ({from_quantity}) to '{to}' ({to_quantity}): incompatible quantities")]
    IncompatibleQuantities {
        from: String,
        to: String,
        from_quantity: String,
        to_quantity: String,
    },
}
