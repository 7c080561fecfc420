//! Threshold filters: binary, to-zero, adaptive and Otsu

use crate::core::filter::{Category, FilterMetadata, FilterOp};
use crate::core::params::{BoundedInteger, ChoiceSet, ParameterSet, RadioSelect};
use crate::core::types::Raster;
use crate::filters::builtin::blur::gaussian_kernel;
use crate::filters::kernel::separable;
use crate::filters::options::BorderType;
use image::{GrayImage, Luma, Rgb};

/// Luma of `image`, broadcast back to three channels.
fn gray_raster(image: &Raster) -> Raster {
    let gray = image::imageops::grayscale(image);
    Raster::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y).0[0];
        Rgb([v, v, v])
    })
}

fn max_value(params: &ParameterSet) -> u8 {
    params.get_integer("max_value").unwrap_or(255).clamp(0, 255) as u8
}

/// Binary threshold applied to every channel.
#[derive(Debug, Clone, Copy)]
pub struct Threshold;

impl FilterOp for Threshold {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("threshold", "Threshold", Category::Threshold)
            .with_description("Channel values above the threshold become max_value, others 0")
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .integer("threshold", BoundedInteger::new(0, 0, 255))
            .integer("max_value", BoundedInteger::new(255, 0, 255))
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        let threshold = params.get_integer("threshold").unwrap_or(0);
        let max = max_value(params);
        let mut result = image.clone();
        for value in result.iter_mut() {
            *value = if i64::from(*value) > threshold { max } else { 0 };
        }
        result
    }
}

/// Zeroes channel values at or below the threshold.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdToZero;

impl FilterOp for ThresholdToZero {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("threshold_to_zero", "Threshold to Zero", Category::Threshold)
            .with_description("Channel values at or below the threshold become 0, others pass")
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new().integer("threshold", BoundedInteger::new(0, 0, 255))
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        let threshold = params.get_integer("threshold").unwrap_or(0);
        let mut result = image.clone();
        for value in result.iter_mut() {
            if i64::from(*value) <= threshold {
                *value = 0;
            }
        }
        result
    }
}

/// How the local mean of an adaptive threshold is weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptiveMethod {
    Mean,
    Gaussian,
}

impl ChoiceSet for AdaptiveMethod {
    const ALL: &'static [Self] = &[AdaptiveMethod::Mean, AdaptiveMethod::Gaussian];

    fn label(self) -> &'static str {
        match self {
            AdaptiveMethod::Mean => "mean",
            AdaptiveMethod::Gaussian => "gaussian",
        }
    }
}

/// Output polarity of an adaptive threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdType {
    Binary,
    BinaryInv,
}

impl ChoiceSet for ThresholdType {
    const ALL: &'static [Self] = &[ThresholdType::Binary, ThresholdType::BinaryInv];

    fn label(self) -> &'static str {
        match self {
            ThresholdType::Binary => "binary",
            ThresholdType::BinaryInv => "binary_inv",
        }
    }
}

/// Thresholds each pixel against the mean of its neighborhood.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdAdaptive;

impl FilterOp for ThresholdAdaptive {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("threshold_adaptive", "Adaptive Threshold", Category::Threshold)
            .with_description("Per-pixel threshold against the local mean of the grayscale image")
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .integer("max_value", BoundedInteger::new(255, 0, 255))
            .choice(
                "adaptive_method",
                RadioSelect::from_choices(AdaptiveMethod::ALL, AdaptiveMethod::Mean),
            )
            .choice(
                "threshold_type",
                RadioSelect::from_choices(ThresholdType::ALL, ThresholdType::Binary),
            )
            .integer("block_size", BoundedInteger::new(3, 3, 255).with_step(2))
            .integer("constant", BoundedInteger::new(0, -64, 64))
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        let max = max_value(params);
        let method = params
            .get_choice("adaptive_method")
            .unwrap_or(AdaptiveMethod::Mean);
        let kind = params
            .get_choice("threshold_type")
            .unwrap_or(ThresholdType::Binary);
        let block = force_odd(params.get_integer("block_size").unwrap_or(3).max(3));
        let constant = params.get_integer("constant").unwrap_or(0);

        let gray = gray_raster(image);
        let kernel = match method {
            AdaptiveMethod::Mean => vec![1.0 / block as f32; block],
            AdaptiveMethod::Gaussian => gaussian_kernel(block, 0.0),
        };
        let mean = separable(&gray, &kernel, &kernel, BorderType::Replicate);

        let mut result = gray;
        for (value, local) in result.iter_mut().zip(mean.iter()) {
            let above = i64::from(*value) - i64::from(*local) > -constant;
            let on = match kind {
                ThresholdType::Binary => above,
                ThresholdType::BinaryInv => !above,
            };
            *value = if on { max } else { 0 };
        }
        result
    }
}

/// Increment even sizes so the kernel has a center tap.
pub(crate) fn force_odd(size: i64) -> usize {
    let size = size.max(1) as usize;
    if size % 2 == 0 {
        log::debug!("even kernel size {} raised to {}", size, size + 1);
        size + 1
    } else {
        size
    }
}

/// Gaussian-smoothed Otsu binarization of the grayscale image.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdOtsuGauss;

impl FilterOp for ThresholdOtsuGauss {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("threshold_otsu_gauss", "Otsu's Binarization Threshold", Category::Threshold)
            .with_description("5x5 Gaussian blur, then a global Otsu-optimal threshold")
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new().integer("max_value", BoundedInteger::new(255, 0, 255))
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        let max = max_value(params);
        let kernel = gaussian_kernel(5, 0.0);
        let blurred = separable(&gray_raster(image), &kernel, &kernel, BorderType::Reflect101);

        let luma = GrayImage::from_fn(blurred.width(), blurred.height(), |x, y| {
            Luma([blurred.get_pixel(x, y).0[0]])
        });
        let level = imageproc::contrast::otsu_level(&luma);
        log::trace!("otsu level {}", level);

        let mut result = blurred;
        for value in result.iter_mut() {
            *value = if *value > level { max } else { 0 };
        }
        result
    }
}
