//! uc-convert: numeric conversion between catalog units.
//!
//! Three flavours, all restricted to units of the same quantity:
//! - affine (`convert`): ordinary values, offsets honoured (temperature scales)
//! - multiplicative (`convert_multiplier`): rates of change and other
//!   pure-scale values where an offset is meaningless
//! - squared (`convert_square_multiplier`): variances and second moments
//!
//! Results are rounded to 12 significant digits; converting a unit to itself
//! returns the input untouched.
//!
//! # Example
//!
//! ```
//! use uc_catalog::builtin;
//! use uc_convert::convert;
//!
//! let catalog = builtin::global().unwrap();
//! let celsius = catalog.unit("temperature:deg_c").unwrap();
//! let fahrenheit = catalog.unit("temperature:deg_f").unwrap();
//! assert_eq!(convert(celsius, fahrenheit, 10.0).unwrap(), 50.0);
//! ```

pub mod convert;
pub mod error;

pub use convert::{
    ConversionKind, convert, convert_multiplier, convert_square_multiplier, convert_with,
};
pub use error::{ConvertError, ConvertResult};
