//! Morphology filters: Erode, Dilate, MorphologyEx
//!
//! All three share one [`StructuringParams`] block, declared into each
//! kind's parameter set and read back before the transform runs.

use crate::core::filter::{Category, FilterMetadata, FilterOp};
use crate::core::params::{BoundedInteger, ChoiceSet, ParameterSet, RadioSelect};
use crate::core::types::Raster;
use crate::filters::kernel::morph_extreme;
use crate::filters::options::BorderType;

/// Shape of the structuring element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphShape {
    Rect,
    Cross,
    Ellipse,
}

impl ChoiceSet for MorphShape {
    const ALL: &'static [Self] = &[MorphShape::Rect, MorphShape::Cross, MorphShape::Ellipse];

    fn label(self) -> &'static str {
        match self {
            MorphShape::Rect => "rect",
            MorphShape::Cross => "cross",
            MorphShape::Ellipse => "ellipse",
        }
    }
}

/// Compound operation run by [`MorphologyEx`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOperation {
    Open,
    Close,
    Gradient,
    TopHat,
    BlackHat,
}

impl ChoiceSet for MorphOperation {
    const ALL: &'static [Self] = &[
        MorphOperation::Open,
        MorphOperation::Close,
        MorphOperation::Gradient,
        MorphOperation::TopHat,
        MorphOperation::BlackHat,
    ];

    fn label(self) -> &'static str {
        match self {
            MorphOperation::Open => "open",
            MorphOperation::Close => "close",
            MorphOperation::Gradient => "gradient",
            MorphOperation::TopHat => "tophat",
            MorphOperation::BlackHat => "blackhat",
        }
    }
}

/// Structuring element and pass settings shared by the morphology kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuringParams {
    pub shape: MorphShape,
    pub width: usize,
    pub height: usize,
    pub iterations: usize,
    pub border: BorderType,
}

impl StructuringParams {
    /// Append the shared parameters to `params`.
    pub fn declare(params: ParameterSet) -> ParameterSet {
        params
            .choice(
                "kernel_type",
                RadioSelect::from_choices(MorphShape::ALL, MorphShape::Rect),
            )
            .integer("kernel_width", BoundedInteger::new(3, 1, 255))
            .integer("kernel_height", BoundedInteger::new(3, 1, 255))
            .integer("iterations", BoundedInteger::new(1, 1, 255))
            .choice(
                "border_type",
                RadioSelect::from_choices(BorderType::NO_WRAP, BorderType::Constant),
            )
    }

    /// Read the shared parameters back out of a unit's set.
    pub fn read(params: &ParameterSet) -> Self {
        let dim = |name| params.get_integer(name).unwrap_or(3).max(1) as usize;
        Self {
            shape: params.get_choice("kernel_type").unwrap_or(MorphShape::Rect),
            width: dim("kernel_width"),
            height: dim("kernel_height"),
            iterations: params.get_integer("iterations").unwrap_or(1).max(1) as usize,
            border: params.get_choice("border_type").unwrap_or(BorderType::Constant),
        }
    }

    /// Row-major cells of the element; `true` cells take part.
    pub fn cells(&self) -> Vec<bool> {
        let (w, h) = (self.width, self.height);
        let (ax, ay) = (w / 2, h / 2);
        let mut cells = vec![false; w * h];

        let r = (h / 2) as i64;
        let c = (w / 2) as i64;
        let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

        for i in 0..h {
            let (j1, j2) = match self.shape {
                _ if w == 1 || h == 1 => (0, w),
                MorphShape::Rect => (0, w),
                MorphShape::Cross if i == ay => (0, w),
                MorphShape::Cross => (ax, ax + 1),
                MorphShape::Ellipse => {
                    let dy = i as i64 - r;
                    if dy.abs() <= r {
                        let dx = (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as i64;
                        ((c - dx).max(0) as usize, ((c + dx + 1) as usize).min(w))
                    } else {
                        (0, 0)
                    }
                }
            };
            for j in j1..j2 {
                cells[i * w + j] = true;
            }
        }
        cells
    }

    fn anchor(&self) -> (i64, i64) {
        ((self.width / 2) as i64, (self.height / 2) as i64)
    }

    fn pass(&self, image: &Raster, take_max: bool) -> Raster {
        let cells = self.cells();
        let anchor = self.anchor();
        let mut result = morph_extreme(image, &cells, self.width, anchor, self.border, take_max);
        for _ in 1..self.iterations {
            result = morph_extreme(&result, &cells, self.width, anchor, self.border, take_max);
        }
        result
    }

    /// Per-channel minimum under the element, `iterations` times.
    pub fn erode(&self, image: &Raster) -> Raster {
        self.pass(image, false)
    }

    /// Per-channel maximum under the element, `iterations` times.
    pub fn dilate(&self, image: &Raster) -> Raster {
        self.pass(image, true)
    }

    pub fn apply(&self, operation: MorphOperation, image: &Raster) -> Raster {
        match operation {
            MorphOperation::Open => self.dilate(&self.erode(image)),
            MorphOperation::Close => self.erode(&self.dilate(image)),
            MorphOperation::Gradient => difference(&self.dilate(image), &self.erode(image)),
            MorphOperation::TopHat => difference(image, &self.apply(MorphOperation::Open, image)),
            MorphOperation::BlackHat => difference(&self.apply(MorphOperation::Close, image), image),
        }
    }
}

/// Saturating per-byte `a - b`.
fn difference(a: &Raster, b: &Raster) -> Raster {
    let mut result = a.clone();
    for (x, y) in result.iter_mut().zip(b.iter()) {
        *x = x.saturating_sub(*y);
    }
    result
}

/// Morphological erosion.
#[derive(Debug, Clone, Copy)]
pub struct Erode;

impl FilterOp for Erode {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("erode", "Erode", Category::Morphology)
            .with_description("Per-channel minimum under the structuring element")
    }

    fn parameters(&self) -> ParameterSet {
        StructuringParams::declare(ParameterSet::new())
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        StructuringParams::read(params).erode(image)
    }
}

/// Morphological dilation.
#[derive(Debug, Clone, Copy)]
pub struct Dilate;

impl FilterOp for Dilate {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("dilate", "Dilate", Category::Morphology)
            .with_description("Per-channel maximum under the structuring element")
    }

    fn parameters(&self) -> ParameterSet {
        StructuringParams::declare(ParameterSet::new())
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        StructuringParams::read(params).dilate(image)
    }
}

/// Open, close, gradient, top-hat and black-hat.
#[derive(Debug, Clone, Copy)]
pub struct MorphologyEx;

impl FilterOp for MorphologyEx {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("morphology_ex", "Morphological Transformation", Category::Morphology)
            .with_description("Compound morphology built from erosion and dilation")
    }

    fn parameters(&self) -> ParameterSet {
        StructuringParams::declare(ParameterSet::new()).choice(
            "operation",
            RadioSelect::from_choices(MorphOperation::ALL, MorphOperation::Open),
        )
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        let operation = params.get_choice("operation").unwrap_or(MorphOperation::Open);
        StructuringParams::read(params).apply(operation, image)
    }
}
