//! Typed options shared by several filters.
//!
//! Each enum is the single table mapping a user-facing label to the
//! behaviour a filter runs with. Choice parameters are built from these,
//! so every label a unit can hold is known to parse.

use crate::core::params::ChoiceSet;
use serde::{Deserialize, Serialize};

/// Edge-extension policy for pixels sampled outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BorderType {
    /// `000|abcd|000`
    Constant,
    /// `aaa|abcd|ddd`
    Replicate,
    /// `cba|abcd|dcb`
    Reflect,
    /// `bcd|abcd|abc`
    Wrap,
    /// `dcb|abcd|cba`
    #[default]
    Reflect101,
    /// Warps only: outside samples leave the output pixel untouched
    Transparent,
    /// Do not look outside the image; on whole images this is reflect-101
    Isolated,
}

/// Resampling kernel used by geometric warps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interpolation {
    Nearest,
    #[default]
    Linear,
    Cubic,
    /// Resolves to bilinear for warps
    Area,
    Lanczos4,
    /// Resolves to nearest for warps
    NearestExact,
}

impl BorderType {
    /// Border types valid for linear filters (box blur).
    pub const FILTER: &'static [BorderType] = &[
        BorderType::Constant,
        BorderType::Replicate,
        BorderType::Reflect,
        BorderType::Wrap,
        BorderType::Reflect101,
        BorderType::Isolated,
    ];

    /// Border types for filters that cannot wrap around.
    pub const NO_WRAP: &'static [BorderType] = &[
        BorderType::Constant,
        BorderType::Replicate,
        BorderType::Reflect,
        BorderType::Reflect101,
        BorderType::Isolated,
    ];

    /// Border modes valid for geometric warps.
    pub const WARP: &'static [BorderType] = &[
        BorderType::Constant,
        BorderType::Replicate,
        BorderType::Reflect,
        BorderType::Wrap,
        BorderType::Reflect101,
        BorderType::Transparent,
    ];

    /// Map a coordinate `p` that may fall outside `0..len` back into it.
    ///
    /// `None` means the sample takes the constant border value (or, for
    /// [`BorderType::Transparent`], must not be taken at all).
    pub fn resolve(self, p: i64, len: i64) -> Option<i64> {
        if (0..len).contains(&p) {
            return Some(p);
        }
        if len <= 0 {
            return None;
        }
        match self {
            BorderType::Constant | BorderType::Transparent => None,
            BorderType::Replicate => Some(p.clamp(0, len - 1)),
            BorderType::Wrap => Some(p.rem_euclid(len)),
            BorderType::Reflect => Some(reflect(p, len, 0)),
            BorderType::Reflect101 | BorderType::Isolated => Some(reflect(p, len, 1)),
        }
    }
}

/// Mirror `p` into `0..len`; `delta` 1 skips repeating the edge pixel.
///
/// Constant time in `p`: the mirrored sequence repeats every
/// `2 * len - 2 * delta` samples.
fn reflect(p: i64, len: i64, delta: i64) -> i64 {
    if len == 1 {
        return 0;
    }
    let period = 2 * len - 2 * delta;
    let q = p.rem_euclid(period);
    if q < len {
        q
    } else {
        period - 1 - q + delta
    }
}

impl ChoiceSet for BorderType {
    const ALL: &'static [Self] = &[
        BorderType::Constant,
        BorderType::Replicate,
        BorderType::Reflect,
        BorderType::Wrap,
        BorderType::Reflect101,
        BorderType::Transparent,
        BorderType::Isolated,
    ];

    fn label(self) -> &'static str {
        match self {
            BorderType::Constant => "constant",
            BorderType::Replicate => "replicate",
            BorderType::Reflect => "reflect",
            BorderType::Wrap => "wrap",
            BorderType::Reflect101 => "reflect-101",
            BorderType::Transparent => "transparent",
            BorderType::Isolated => "isolated",
        }
    }
}

impl Interpolation {
    /// Interpolations accepted by the polar warp.
    pub const POLAR: &'static [Interpolation] = &[
        Interpolation::Nearest,
        Interpolation::Linear,
        Interpolation::Cubic,
        Interpolation::Lanczos4,
    ];

    /// The kernel a warp actually samples with.
    pub fn for_warp(self) -> Interpolation {
        match self {
            Interpolation::Area => Interpolation::Linear,
            Interpolation::NearestExact => Interpolation::Nearest,
            other => other,
        }
    }
}

impl ChoiceSet for Interpolation {
    const ALL: &'static [Self] = &[
        Interpolation::Nearest,
        Interpolation::Linear,
        Interpolation::Cubic,
        Interpolation::Area,
        Interpolation::Lanczos4,
        Interpolation::NearestExact,
    ];

    fn label(self) -> &'static str {
        match self {
            Interpolation::Nearest => "nearest",
            Interpolation::Linear => "linear",
            Interpolation::Cubic => "cubic",
            Interpolation::Area => "area",
            Interpolation::Lanczos4 => "lanczos4",
            Interpolation::NearestExact => "nearest-exact",
        }
    }
}
