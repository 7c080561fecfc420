//! # Filterbench - Interactive Image Filter Pipelines
//!
//! Filterbench applies an ordered, user-curated chain of image filters to a
//! source image. Each stage is a configured unit of one of a closed set of
//! filter kinds; every edit re-evaluates the whole chain from the
//! unmodified source.
//!
//! ## Features
//!
//! - **Closed filter catalog**: color, threshold, blur, morphology, warp and
//!   convolution kinds, each with a declared, inspectable parameter schema
//! - **Bounded parameters**: numeric values clamp silently into range,
//!   enumerations reject labels outside their set
//! - **Reorderable pipeline**: insert, remove, move and edit units by index
//! - **Observers**: subscribe to every freshly evaluated output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use filterbench::prelude::*;
//!
//! # fn main() -> Result<(), FilterbenchError> {
//! let mut pipeline = Pipeline::new();
//! let blur = pipeline.insert(FilterKind::GaussianBlur)?;
//! pipeline.set_parameter(blur, "sigma_x", "1.5")?;
//! let threshold = pipeline.insert(FilterKind::Threshold)?;
//! pipeline.set_parameter(threshold, "threshold", "100")?;
//!
//! let source = filterbench::io::decode("input.png")?;
//! let output = pipeline.evaluate(&source);
//! filterbench::io::encode(&output, "output.png", &ExportConfig::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: values, bounded parameters, schemas, the `FilterOp` trait and
//!   errors
//! - [`filters`]: the filter catalog, built-in kinds and shared kernels
//! - [`pipeline`]: filter units and the ordered pipeline
//! - [`io`]: image decode and encode
//! - [`config`]: TOML editor configuration

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod filters;
pub mod io;
pub mod pipeline;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use filterbench::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{ParamKind, Raster, UnitId, Value};

    // Parameters and schema
    pub use crate::core::params::{BoundedDouble, BoundedInteger, ChoiceSet, Parameter, ParameterSet, RadioSelect};
    pub use crate::core::schema::{ParameterDefinition, Schema, UiHint};

    // Filter trait and metadata
    pub use crate::core::filter::{Category, FilterMetadata, FilterOp};

    // Errors
    pub use crate::core::error::{
        ConfigError, FilterbenchError, FilterbenchResult, ImageIoError, ParameterError,
        PipelineError,
    };

    // Filters
    pub use crate::filters::catalog::{CatalogEntry, FilterCatalog, FilterKind};
    pub use crate::filters::options::{BorderType, Interpolation};

    // Pipeline
    pub use crate::pipeline::{FilterUnit, Pipeline, SharedPipeline};

    // Configuration
    pub use crate::config::{EditorConfig, ExportConfig, PngCompression};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "filterbench");
    }

    #[test]
    fn test_catalog_covers_kinds() {
        let catalog = FilterCatalog::new();
        assert!(catalog.get("invert").is_some());
        assert!(catalog.get("threshold_adaptive").is_some());
        assert!(catalog.get("warp_polar").is_some());
        assert!(catalog.get("convolve").is_some());
    }

    #[test]
    fn test_basic_pipeline() {
        let mut pipeline = Pipeline::new();
        let index = pipeline.insert(FilterKind::Invert).unwrap();
        assert_eq!(index, 0);
        assert_eq!(pipeline.len(), 1);
        assert_eq!(pipeline.units()[0].name(), "Invert");
    }
}
