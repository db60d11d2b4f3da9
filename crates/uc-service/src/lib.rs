//! Partition-aware service layer for the unit catalog.
//!
//! The global partition is the bundled catalog from [`uc_catalog::builtin`].
//! Every other partition is fetched from a [`CatalogSource`] the first time
//! it is referenced, validated, and cached for the life of the process.
//! Both the CLI and embedding services go through [`UnitService`].

pub mod error;
pub mod registry;
pub mod service;
pub mod source;

pub use error::{ServiceError, ServiceResult, SourceError};
pub use registry::PartitionRegistry;
pub use service::{GLOBAL_PARTITION, SystemValue, UnitService};
pub use source::{CatalogSource, DirectorySource, StaticSource};
