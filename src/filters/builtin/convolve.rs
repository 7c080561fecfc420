//! Convolution filters: fixed presets and a user-supplied 3x3 kernel

use crate::core::filter::{Category, FilterMetadata, FilterOp};
use crate::core::params::{BoundedDouble, BoundedInteger, ChoiceSet, ParameterSet, RadioSelect};
use crate::core::types::Raster;
use crate::filters::kernel::filter2d;
use crate::filters::options::BorderType;

const SIDE: usize = 3;

/// One of the fixed 3x3 kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvolvePreset {
    Sharpen,
    EdgeDetect,
    Emboss,
    Sobel,
}

impl ConvolvePreset {
    /// Row-major kernel taps.
    pub fn kernel(self) -> [f32; 9] {
        match self {
            ConvolvePreset::Sharpen => [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0],
            ConvolvePreset::EdgeDetect => [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
            ConvolvePreset::Emboss => [-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0],
            ConvolvePreset::Sobel => [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
        }
    }
}

impl ChoiceSet for ConvolvePreset {
    const ALL: &'static [Self] = &[
        ConvolvePreset::Sharpen,
        ConvolvePreset::EdgeDetect,
        ConvolvePreset::Emboss,
        ConvolvePreset::Sobel,
    ];

    fn label(self) -> &'static str {
        match self {
            ConvolvePreset::Sharpen => "Sharpen",
            ConvolvePreset::EdgeDetect => "EdgeDetect",
            ConvolvePreset::Emboss => "Emboss",
            ConvolvePreset::Sobel => "Sobel",
        }
    }
}

fn border_param() -> RadioSelect {
    RadioSelect::from_choices(BorderType::NO_WRAP, BorderType::Reflect101)
}

/// Applies a named fixed kernel.
#[derive(Debug, Clone, Copy)]
pub struct ConvolvePresets;

impl FilterOp for ConvolvePresets {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("convolve_presets", "Convolve Presets", Category::Convolve)
            .with_description("Sharpen, edge detect, emboss or Sobel 3x3 kernels")
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .choice(
                "preset",
                RadioSelect::from_choices(ConvolvePreset::ALL, ConvolvePreset::Sharpen),
            )
            .choice("border_type", border_param())
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        let preset = params.get_choice("preset").unwrap_or(ConvolvePreset::Sharpen);
        let border = params.get_choice("border_type").unwrap_or_default();
        filter2d(image, &preset.kernel(), SIDE, (1, 1), 0.0, border)
    }
}

/// Generic 3x3 correlation with anchor and bias.
#[derive(Debug, Clone, Copy)]
pub struct Convolve;

impl Convolve {
    /// Anchor coordinate: `-1` is the center, larger values stop at the
    /// last tap.
    fn anchor(value: i64) -> i64 {
        if value < 0 {
            (SIDE / 2) as i64
        } else {
            value.min(SIDE as i64 - 1)
        }
    }
}

impl FilterOp for Convolve {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("convolve", "Convolve", Category::Convolve)
            .with_description("User-defined 3x3 kernel M11..M33 plus delta")
    }

    fn parameters(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        for r in 1..=SIDE {
            for c in 1..=SIDE {
                let default = if r == 2 && c == 2 { 1.0 } else { 0.0 };
                params = params.double(
                    &format!("M{}{}", r, c),
                    BoundedDouble::new(default, -10.0, 10.0).with_step(0.01),
                );
            }
        }
        params
            .integer("anchor_x", BoundedInteger::new(-1, -1, 3))
            .integer("anchor_y", BoundedInteger::new(-1, -1, 3))
            .integer("delta", BoundedInteger::new(0, -255, 255))
            .choice("border_type", border_param())
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        let mut kernel = [0f32; SIDE * SIDE];
        for (i, tap) in kernel.iter_mut().enumerate() {
            let name = format!("M{}{}", i / SIDE + 1, i % SIDE + 1);
            *tap = params.get_double(&name).unwrap_or(0.0) as f32;
        }
        let anchor = (
            Self::anchor(params.get_integer("anchor_x").unwrap_or(-1)),
            Self::anchor(params.get_integer("anchor_y").unwrap_or(-1)),
        );
        let delta = params.get_integer("delta").unwrap_or(0) as f32;
        let border = params.get_choice("border_type").unwrap_or_default();
        filter2d(image, &kernel, SIDE, anchor, delta, border)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn stripes() -> Raster {
        Raster::from_fn(5, 4, |x, y| Rgb([(x * 50) as u8, (y * 40) as u8, 77]))
    }

    #[test]
    fn test_preset_kernels_literal() {
        assert_eq!(ConvolvePreset::Sharpen.kernel().iter().sum::<f32>(), 1.0);
        assert_eq!(ConvolvePreset::EdgeDetect.kernel().iter().sum::<f32>(), 0.0);
        assert_eq!(ConvolvePreset::Emboss.kernel()[0], -2.0);
        assert_eq!(ConvolvePreset::Sobel.kernel()[3], -2.0);
    }

    #[test]
    fn test_sharpen_and_edge_on_flat() {
        let img = Raster::from_pixel(4, 4, Rgb([60, 120, 180]));
        let mut params = ConvolvePresets.parameters();
        assert_eq!(ConvolvePresets.transform(&params, &img), img);

        params.set_raw("preset", "EdgeDetect").unwrap();
        let out = ConvolvePresets.transform(&params, &img);
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_sobel_responds_to_horizontal_ramp() {
        let img = Raster::from_fn(5, 3, |x, _| Rgb([(x * 10) as u8, 0, 0]));
        let mut params = ConvolvePresets.parameters();
        params.set_raw("preset", "Sobel").unwrap();
        let out = ConvolvePresets.transform(&params, &img);
        // (1 + 2 + 1) * (30 - 10)
        assert_eq!(out.get_pixel(2, 1).0, [80, 0, 0]);
    }

    #[test]
    fn test_default_convolve_is_identity() {
        let img = stripes();
        assert_eq!(Convolve.transform(&Convolve.parameters(), &img), img);
    }

    #[test]
    fn test_convolve_delta() {
        let img = stripes();
        let mut params = Convolve.parameters();
        params.set_raw("delta", "10").unwrap();
        let out = Convolve.transform(&params, &img);
        assert_eq!(out.get_pixel(1, 1).0, [60, 50, 87]);
    }

    #[test]
    fn test_convolve_anchor_shifts() {
        let img = stripes();
        let mut params = Convolve.parameters();
        params.set_raw("anchor_x", "0").unwrap();
        // Center tap sits one column right of the anchor.
        let out = Convolve.transform(&params, &img);
        assert_eq!(out.get_pixel(1, 1), img.get_pixel(2, 1));

        params.set_raw("anchor_x", "3").unwrap();
        let out = Convolve.transform(&params, &img);
        assert_eq!(out.get_pixel(2, 1), img.get_pixel(1, 1));
    }

    #[test]
    fn test_anchor_resolution() {
        assert_eq!(Convolve::anchor(-1), 1);
        assert_eq!(Convolve::anchor(0), 0);
        assert_eq!(Convolve::anchor(3), 2);
    }
}
