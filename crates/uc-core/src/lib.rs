//! uc-core: shared foundation for unitcat.
//!
//! Contains:
//! - numeric (Real + tolerances + significant-digit rounding)
//! - error (shared error types)

pub mod error;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::CoreError;
pub use numeric::*;
