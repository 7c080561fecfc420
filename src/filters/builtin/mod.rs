//! Built-in filter implementations.
//!
//! Every kind in the catalog lives here, grouped by category.

mod blur;
mod color;
mod convolve;
mod morphology;
mod threshold;
mod transform;

pub use blur::{gaussian_kernel, BoxBlur, GaussianBlur, MedianBlur};
pub use color::{Channel, GammaCorrect, Invert, SplitChannel};
pub use convolve::{Convolve, ConvolvePreset, ConvolvePresets};
pub use morphology::{Dilate, Erode, MorphOperation, MorphShape, MorphologyEx, StructuringParams};
pub use threshold::{
    AdaptiveMethod, Threshold, ThresholdAdaptive, ThresholdOtsuGauss, ThresholdToZero,
    ThresholdType,
};
pub use transform::{invert, warp, Affine, Matrix3, Perspective, Rotate, WarpPolar};
