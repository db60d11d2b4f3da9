//! Conversion routines.

use std::fmt;
use uc_catalog::UnitDef;
use uc_core::{Real, SIGNIFICANT_DIGITS, round_significant};

use crate::error::{ConvertError, ConvertResult};

/// How a value relates to its unit's base representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionKind {
    /// `(value + offset) * multiplier`
    #[default]
    Affine,
    /// `value * multiplier`
    Multiplier,
    /// `value * multiplier²`
    SquareMultiplier,
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Affine => write!(f, "affine"),
            Self::Multiplier => write!(f, "multiplier"),
            Self::SquareMultiplier => write!(f, "square multiplier"),
        }
    }
}

/// Convert a value between units, honouring offsets.
pub fn convert(from: &UnitDef, to: &UnitDef, value: Real) -> ConvertResult<Real> {
    convert_with(ConversionKind::Affine, from, to, value)
}

/// Convert a pure-scale value (e.g. a rate of change) between units,
/// ignoring offsets.
pub fn convert_multiplier(from: &UnitDef, to: &UnitDef, value: Real) -> ConvertResult<Real> {
    convert_with(ConversionKind::Multiplier, from, to, value)
}

/// Convert a value that scales with the square of the unit (e.g. a
/// variance) between units.
pub fn convert_square_multiplier(
    from: &UnitDef,
    to: &UnitDef,
    value: Real,
) -> ConvertResult<Real> {
    convert_with(ConversionKind::SquareMultiplier, from, to, value)
}

pub fn convert_with(
    kind: ConversionKind,
    from: &UnitDef,
    to: &UnitDef,
    value: Real,
) -> ConvertResult<Real> {
    check_compatible(from, to)?;

    // Skip the arithmetic so the identity conversion is exact
    if from.external_id == to.external_id {
        return Ok(value);
    }

    let (src, dst) = (&from.conversion, &to.conversion);
    let result = match kind {
        ConversionKind::Affine => {
            let base = (value + src.offset) * src.multiplier;
            base / dst.multiplier - dst.offset
        }
        ConversionKind::Multiplier => value * src.multiplier / dst.multiplier,
        ConversionKind::SquareMultiplier => {
            value * src.multiplier.powi(2) / dst.multiplier.powi(2)
        }
    };

    Ok(round_significant(result, SIGNIFICANT_DIGITS))
}

fn check_compatible(from: &UnitDef, to: &UnitDef) -> ConvertResult<()> {
    if from.quantity != to.quantity {
        return Err(ConvertError::IncompatibleQuantities {
            from: from.external_id.clone(),
            to: to.external_id.clone(),
            from_quantity: from.quantity.clone(),
            to_quantity: to.quantity.clone(),
        });
    }
    Ok(())
}
