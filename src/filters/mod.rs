//! Filter module.
//!
//! Contains the filter catalog, the built-in filter implementations and the
//! neighborhood and resampling kernels they share.

pub mod builtin;
pub mod catalog;
pub mod kernel;
pub mod options;
pub mod remap;

pub use catalog::{CatalogEntry, FilterCatalog, FilterKind};
pub use options::{BorderType, Interpolation};
