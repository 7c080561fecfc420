//! Blur filters: Box, Median, Gaussian

use crate::core::filter::{Category, FilterMetadata, FilterOp};
use crate::core::params::{BoundedDouble, BoundedInteger, ParameterSet, RadioSelect};
use crate::core::types::Raster;
use crate::filters::builtin::threshold::force_odd;
use crate::filters::kernel::separable;
use crate::filters::options::BorderType;

/// Fixed small-kernel tables used when sigma is not given.
const SMALL_GAUSSIAN: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.015625, 0.09375, 0.234375, 0.3125, 0.234375, 0.09375, 0.015625,
    ],
];

/// Normalized 1-D Gaussian of `size` taps.
///
/// A non-positive `sigma` is derived from the size; odd sizes up to 7 then
/// use the fixed tables.
pub fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f32> {
    let size = size.max(1);
    if sigma <= 0.0 && size % 2 == 1 && size <= 7 {
        return SMALL_GAUSSIAN[size / 2].to_vec();
    }

    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let scale = -0.5 / (sigma * sigma);
    let center = (size as f64 - 1.0) * 0.5;
    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - center;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|v| (v / sum) as f32).collect()
}

/// Kernel size implied by `sigma` when none is given.
fn size_from_sigma(sigma: f64) -> usize {
    ((sigma * 6.0 + 1.0).round() as usize) | 1
}

fn border_param(allowed: &[BorderType]) -> RadioSelect {
    RadioSelect::from_choices(allowed, BorderType::Reflect101)
}

/// Normalized box filter.
#[derive(Debug, Clone, Copy)]
pub struct BoxBlur;

impl FilterOp for BoxBlur {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("box_blur", "Box Blur", Category::Blur)
            .with_description("Average over a kernel_width x kernel_height window")
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .integer("kernel_width", BoundedInteger::new(3, 1, 255))
            .integer("kernel_height", BoundedInteger::new(3, 1, 255))
            .choice("border_type", border_param(BorderType::FILTER))
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        let w = params.get_integer("kernel_width").unwrap_or(3).max(1) as usize;
        let h = params.get_integer("kernel_height").unwrap_or(3).max(1) as usize;
        let border = params.get_choice("border_type").unwrap_or_default();

        let kx = vec![1.0 / w as f32; w];
        let ky = vec![1.0 / h as f32; h];
        separable(image, &kx, &ky, border)
    }
}

/// Median over a square neighborhood.
#[derive(Debug, Clone, Copy)]
pub struct MedianBlur;

impl FilterOp for MedianBlur {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("median_blur", "Median Blur", Category::Blur)
            .with_description("Per-channel median over a ksize x ksize window")
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new().integer("ksize", BoundedInteger::new(3, 1, 255).with_step(2))
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        let ksize = force_odd(params.get_integer("ksize").unwrap_or(3));
        if ksize == 1 {
            return image.clone();
        }
        let radius = (ksize / 2) as u32;
        imageproc::filter::median_filter(image, radius, radius)
    }
}

/// Separable Gaussian smoothing.
#[derive(Debug, Clone, Copy)]
pub struct GaussianBlur;

impl FilterOp for GaussianBlur {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("gaussian_blur", "Gaussian Blur", Category::Blur)
            .with_description("Separable Gaussian convolution; size 0 is derived from sigma")
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .integer("kernel_width", BoundedInteger::new(3, 0, 255).with_step(2))
            .integer("kernel_height", BoundedInteger::new(3, 0, 255).with_step(2))
            .double("sigma_x", BoundedDouble::new(0.0, 0.0, 63.0))
            .double("sigma_y", BoundedDouble::new(0.0, 0.0, 63.0))
            .choice("border_type", border_param(BorderType::NO_WRAP))
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        let sigma_x = params.get_double("sigma_x").unwrap_or(0.0);
        let sigma_y = match params.get_double("sigma_y").unwrap_or(0.0) {
            s if s > 0.0 => s,
            _ => sigma_x,
        };
        let size = |name: &str, sigma: f64| match params.get_integer(name).unwrap_or(3) {
            n if n > 0 => force_odd(n),
            _ => size_from_sigma(sigma),
        };
        let kx = gaussian_kernel(size("kernel_width", sigma_x), sigma_x);
        let ky = gaussian_kernel(size("kernel_height", sigma_y), sigma_y);
        let border = params.get_choice("border_type").unwrap_or_default();
        separable(image, &kx, &ky, border)
    }
}
