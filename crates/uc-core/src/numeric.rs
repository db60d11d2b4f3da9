use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// Number of significant digits kept by every non-identity conversion.
pub const SIGNIFICANT_DIGITS: i32 = 12;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Round `value` to `digits` significant decimal digits.
///
/// Suppresses representation noise left over from multiplier/offset
/// arithmetic, e.g. `0.9999999999999998` becomes `1.0`. Zero and
/// non-finite values come back untouched, as do values so small that the
/// scaling factor itself would overflow.
pub fn round_significant(value: Real, digits: i32) -> Real {
    if value == 0.0 || !value.is_finite() {
        return value;
    }

    let magnitude_digits = value.abs().log10().ceil() as i32;
    let power = digits - magnitude_digits;

    // Negative powers divide by an exact power of ten instead of multiplying
    // by an inexact reciprocal.
    let (scaled, magnitude) = if power >= 0 {
        let magnitude = 10f64.powi(power);
        (value * magnitude, magnitude)
    } else {
        let magnitude = 10f64.powi(-power);
        (value / magnitude, magnitude)
    };

    if !scaled.is_finite() || !magnitude.is_finite() {
        return value;
    }

    let rounded = scaled.round_ties_even();
    if power >= 0 {
        rounded / magnitude
    } else {
        rounded * magnitude
    }
}
