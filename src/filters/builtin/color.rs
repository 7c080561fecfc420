//! Color filters: Invert, Split Channel, Gamma Correct

use crate::core::filter::{Category, FilterMetadata, FilterOp};
use crate::core::params::{BoundedDouble, ChoiceSet, ParameterSet, RadioSelect};
use crate::core::types::Raster;
use image::Rgb;

/// Complements every channel byte.
#[derive(Debug, Clone, Copy)]
pub struct Invert;

impl FilterOp for Invert {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("invert", "Invert", Category::Color)
            .with_description("Replace every channel value v with 255 - v")
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new()
    }

    fn transform(&self, _params: &ParameterSet, image: &Raster) -> Raster {
        let mut result = image.clone();
        image::imageops::invert(&mut result);
        result
    }
}

/// Color channel kept by [`SplitChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

impl ChoiceSet for Channel {
    const ALL: &'static [Self] = &[Channel::Red, Channel::Green, Channel::Blue];

    fn label(self) -> &'static str {
        match self {
            Channel::Red => "Red",
            Channel::Green => "Green",
            Channel::Blue => "Blue",
        }
    }
}

/// Keeps one color channel and zeroes the other two.
#[derive(Debug, Clone, Copy)]
pub struct SplitChannel;

impl FilterOp for SplitChannel {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("split_channel", "Split Channel", Category::Color)
            .with_description("Keep the selected channel, zero the others")
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new().choice("channel", RadioSelect::from_choices(Channel::ALL, Channel::Red))
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        let keep = params.get_choice::<Channel>("channel").unwrap_or(Channel::Red).index();
        let mut result = image.clone();
        for pixel in result.pixels_mut() {
            let mut split = [0u8; 3];
            split[keep] = pixel.0[keep];
            *pixel = Rgb(split);
        }
        result
    }
}

/// Applies a power-law curve through a 256-entry lookup table.
#[derive(Debug, Clone, Copy)]
pub struct GammaCorrect;

impl GammaCorrect {
    /// `lut[i] = 255 * (i / 255)^gamma`, rounded and clamped.
    pub fn lookup_table(gamma: f64) -> [u8; 256] {
        let mut lut = [0u8; 256];
        for (i, entry) in lut.iter_mut().enumerate() {
            let v = 255.0 * (i as f64 / 255.0).powf(gamma);
            *entry = v.round().clamp(0.0, 255.0) as u8;
        }
        lut
    }
}

impl FilterOp for GammaCorrect {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("gamma_correct", "Gamma Correct", Category::Color)
            .with_description("Per-channel power-law correction via lookup table")
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new().double("gamma", BoundedDouble::new(1.0, 0.0, 10.0).with_step(0.01))
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        let lut = Self::lookup_table(params.get_double("gamma").unwrap_or(1.0));
        let mut result = image.clone();
        for value in result.iter_mut() {
            *value = lut[*value as usize];
        }
        result
    }
}
