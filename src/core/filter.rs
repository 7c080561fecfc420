//! FilterOp trait and filter metadata.
//!
//! A filter kind is a stateless operation: its configuration lives in the
//! [`ParameterSet`] each filter unit owns, and `transform` is a pure
//! function of that set and the input raster.

use crate::core::params::ParameterSet;
use crate::core::types::Raster;
use serde::{Deserialize, Serialize};

/// Category for organizing filters in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Per-pixel color transforms
    Color,
    /// Binarization
    Threshold,
    /// Smoothing
    Blur,
    /// Erosion, dilation and friends
    Morphology,
    /// Geometric warps
    Warp,
    /// 3x3 convolutions
    Convolve,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Color => "Color",
            Category::Threshold => "Threshold",
            Category::Blur => "Blur",
            Category::Morphology => "Morphology",
            Category::Warp => "Warp",
            Category::Convolve => "Convolve",
        }
    }

    /// Get all categories in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Color,
            Category::Threshold,
            Category::Blur,
            Category::Morphology,
            Category::Warp,
            Category::Convolve,
        ]
    }
}

/// Metadata describing a filter kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterMetadata {
    /// Unique identifier for this filter kind (e.g., "gaussian_blur")
    pub id: String,
    /// Human-readable name (e.g., "Gaussian Blur")
    pub name: String,
    /// Category for UI organization
    pub category: Category,
    /// Detailed description
    pub description: String,
}

impl FilterMetadata {
    /// Create metadata with an empty description.
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// The core trait for filter kinds.
///
/// # Design
///
/// Implementors are zero-sized: everything a transform needs comes from the
/// parameter set it is handed. The `active` flag is handled by the filter
/// unit, so `transform` always transforms.
///
/// `transform` must never mutate its input; the same source raster is the
/// root of every re-evaluation.
///
/// # Thread Safety
///
/// `Send + Sync` bounds let a pipeline be evaluated from a worker thread.
pub trait FilterOp: Send + Sync {
    /// Get the metadata for this filter kind.
    fn metadata(&self) -> FilterMetadata;

    /// Default parameters for a new unit of this kind, `active` included.
    fn parameters(&self) -> ParameterSet;

    /// Produce a new raster from `image` using `params`.
    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Blur.display_name(), "Blur");
        assert_eq!(Category::all().len(), 6);
    }

    #[test]
    fn test_metadata_builder() {
        let metadata = FilterMetadata::new("invert", "Invert", Category::Color)
            .with_description("Complement every channel");
        assert_eq!(metadata.id, "invert");
        assert_eq!(metadata.category, Category::Color);
        assert!(!metadata.description.is_empty());
    }
}
