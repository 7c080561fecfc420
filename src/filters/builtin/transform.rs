//! Warp filters: Rotate, Affine, Perspective, Warp Polar

use crate::core::filter::{Category, FilterMetadata, FilterOp};
use crate::core::params::{BoundedDouble, BoundedInteger, ChoiceSet, ParameterSet, RadioSelect};
use crate::core::types::Raster;
use crate::filters::options::{BorderType, Interpolation};
use crate::filters::remap::remap;
use std::f64::consts::PI;

/// Row-major 3x3 homogeneous matrix.
pub type Matrix3 = [[f64; 3]; 3];

const IDENTITY: Matrix3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
const SINGULAR_EPSILON: f64 = 1e-12;

/// Inverse of `m`, or `None` when it is singular.
pub fn invert(m: &Matrix3) -> Option<Matrix3> {
    let cof = |r0: usize, r1: usize, c0: usize, c1: usize| {
        m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
    };
    let det = m[0][0] * cof(1, 2, 1, 2) - m[0][1] * cof(1, 2, 0, 2) + m[0][2] * cof(1, 2, 0, 1);
    if det.abs() < SINGULAR_EPSILON || !det.is_finite() {
        return None;
    }
    let d = 1.0 / det;
    Some([
        [cof(1, 2, 1, 2) * d, -cof(0, 2, 1, 2) * d, cof(0, 1, 1, 2) * d],
        [-cof(1, 2, 0, 2) * d, cof(0, 2, 0, 2) * d, -cof(0, 1, 0, 2) * d],
        [cof(1, 2, 0, 1) * d, -cof(0, 2, 0, 1) * d, cof(0, 1, 0, 1) * d],
    ])
}

/// Resample `image` through `matrix`.
///
/// Without `inverse_map` the matrix maps source to destination and is
/// inverted first; with it, the matrix already maps destination to source.
/// A singular matrix yields a black image. `fill` is the level read outside
/// the source under a constant border.
pub fn warp(
    image: &Raster,
    matrix: &Matrix3,
    inverse_map: bool,
    interpolation: Interpolation,
    border: BorderType,
    fill: u8,
) -> Raster {
    let (w, h) = image.dimensions();
    let Some(inverse) = invert(matrix) else {
        log::debug!("singular warp matrix {:?}", matrix);
        return Raster::new(w, h);
    };
    let m = if inverse_map { *matrix } else { inverse };

    remap(
        image,
        w,
        h,
        |x, y| {
            let z = m[2][0] * x + m[2][1] * y + m[2][2];
            if z.abs() < f64::EPSILON {
                return None;
            }
            Some((
                (m[0][0] * x + m[0][1] * y + m[0][2]) / z,
                (m[1][0] * x + m[1][1] * y + m[1][2]) / z,
            ))
        },
        interpolation,
        border,
        fill,
    )
}

/// Declare `M{r}{c}` entries for the first `rows` rows of a matrix.
fn declare_matrix(mut params: ParameterSet, rows: usize) -> ParameterSet {
    for (r, row) in IDENTITY.iter().take(rows).enumerate() {
        for (c, value) in row.iter().enumerate() {
            let name = format!("M{}{}", r + 1, c + 1);
            params = params.double(&name, BoundedDouble::new(*value, -10.0, 10.0).with_step(0.01));
        }
    }
    params
}

/// Read back a matrix declared by [`declare_matrix`]; missing rows stay
/// identity.
fn read_matrix(params: &ParameterSet, rows: usize) -> Matrix3 {
    let mut m = IDENTITY;
    for (r, row) in m.iter_mut().take(rows).enumerate() {
        for (c, value) in row.iter_mut().enumerate() {
            if let Some(v) = params.get_double(&format!("M{}{}", r + 1, c + 1)) {
                *value = v;
            }
        }
    }
    m
}

fn declare_warp_options(params: ParameterSet) -> ParameterSet {
    params
        .choice(
            "flags",
            RadioSelect::from_choices(Interpolation::ALL, Interpolation::Linear),
        )
        .choice(
            "border_mode",
            RadioSelect::from_choices(BorderType::WARP, BorderType::Constant),
        )
        .integer("border_value", BoundedInteger::new(0, 0, 255))
        .flag("inverse_map", false)
}

fn matrix_warp(params: &ParameterSet, image: &Raster, rows: usize) -> Raster {
    let matrix = read_matrix(params, rows);
    warp(
        image,
        &matrix,
        params.get_flag("inverse_map").unwrap_or(false),
        params.get_choice("flags").unwrap_or_default(),
        params.get_choice("border_mode").unwrap_or(BorderType::Constant),
        params.get_integer("border_value").unwrap_or(0).clamp(0, 255) as u8,
    )
}

/// Rotation about the image center.
#[derive(Debug, Clone, Copy)]
pub struct Rotate;

impl Rotate {
    /// Source-to-destination matrix for a counter-clockwise rotation of
    /// `degrees` about `(cx, cy)`.
    pub fn matrix(degrees: f64, cx: f64, cy: f64) -> Matrix3 {
        let (b, a) = degrees.to_radians().sin_cos();
        [
            [a, b, (1.0 - a) * cx - b * cy],
            [-b, a, b * cx + (1.0 - a) * cy],
            [0.0, 0.0, 1.0],
        ]
    }
}

impl FilterOp for Rotate {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("rotate", "Rotate", Category::Warp)
            .with_description("Rotate about the image center, keeping the image size")
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new().double("theta", BoundedDouble::new(0.0, -360.0, 360.0))
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        let theta = params.get_double("theta").unwrap_or(0.0);
        let (w, h) = image.dimensions();
        let cx = (w as f64 - 1.0) / 2.0;
        let cy = (h as f64 - 1.0) / 2.0;
        warp(
            image,
            &Self::matrix(theta, cx, cy),
            false,
            Interpolation::Linear,
            BorderType::Constant,
            0,
        )
    }
}

/// Warp through a 2x3 affine matrix.
#[derive(Debug, Clone, Copy)]
pub struct Affine;

impl FilterOp for Affine {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("affine", "Affine", Category::Warp)
            .with_description("Warp through the 2x3 matrix M11..M23")
    }

    fn parameters(&self) -> ParameterSet {
        declare_warp_options(declare_matrix(ParameterSet::new(), 2))
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        matrix_warp(params, image, 2)
    }
}

/// Warp through a 3x3 perspective matrix.
#[derive(Debug, Clone, Copy)]
pub struct Perspective;

impl FilterOp for Perspective {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("perspective", "Perspective", Category::Warp)
            .with_description("Warp through the 3x3 homography M11..M33")
    }

    fn parameters(&self) -> ParameterSet {
        declare_warp_options(declare_matrix(ParameterSet::new(), 3))
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        matrix_warp(params, image, 3)
    }
}

/// Cartesian to polar (or log-polar) remap about the image center.
///
/// Output columns are radius and rows are angle; `INVERSE_MAP` runs the
/// reverse mapping.
#[derive(Debug, Clone, Copy)]
pub struct WarpPolar;

impl FilterOp for WarpPolar {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("warp_polar", "Warp Polar", Category::Warp)
            .with_description("Polar or log-polar remap centered on the image center")
    }

    fn parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .integer("max_radius", BoundedInteger::new(128, 0, 4096))
            .choice(
                "flags",
                RadioSelect::from_choices(Interpolation::POLAR, Interpolation::Linear),
            )
            .flag("POLAR_LOG", false)
            .flag("INVERSE_MAP", false)
    }

    fn transform(&self, params: &ParameterSet, image: &Raster) -> Raster {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return image.clone();
        }
        let max_radius = params.get_integer("max_radius").unwrap_or(128).max(1) as f64;
        let log_scale = params.get_flag("POLAR_LOG").unwrap_or(false);
        let inverse = params.get_flag("INVERSE_MAP").unwrap_or(false);
        let interpolation = params.get_choice("flags").unwrap_or_default();

        let (wf, hf) = (w as f64, h as f64);
        let cx = (wf - 1.0) / 2.0;
        let cy = (hf - 1.0) / 2.0;
        let k_angle = hf / (2.0 * PI);
        let k_mag = wf / max_radius;
        let k_log = wf / max_radius.ln();

        if inverse {
            remap(
                image,
                w,
                h,
                |x, y| {
                    let (dx, dy) = (x - cx, y - cy);
                    let magnitude = dx.hypot(dy);
                    let angle = dy.atan2(dx).rem_euclid(2.0 * PI);
                    let rho = if log_scale {
                        k_log * (magnitude + 1.0).ln()
                    } else {
                        k_mag * magnitude
                    };
                    Some((rho, angle * k_angle))
                },
                interpolation,
                BorderType::Constant,
                0,
            )
        } else {
            remap(
                image,
                w,
                h,
                |x, y| {
                    let rho = if log_scale {
                        (x / k_log).exp() - 1.0
                    } else {
                        x / k_mag
                    };
                    let (sin, cos) = (y / k_angle).sin_cos();
                    Some((cx + rho * cos, cy + rho * sin))
                },
                interpolation,
                BorderType::Constant,
                0,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(w: u32, h: u32) -> Raster {
        Raster::from_fn(w, h, |x, y| Rgb([(x * 40) as u8, (y * 60) as u8, 100]))
    }

    #[test]
    fn test_invert_matrix() {
        let m = [[2.0, 0.0, 3.0], [0.0, 4.0, -1.0], [0.0, 0.0, 1.0]];
        let inv = invert(&m).unwrap();
        assert!((inv[0][0] - 0.5).abs() < 1e-12);
        assert!((inv[0][2] + 1.5).abs() < 1e-12);
        assert!((inv[1][1] - 0.25).abs() < 1e-12);
        assert!((inv[1][2] - 0.25).abs() < 1e-12);

        let singular = [[1.0, 2.0, 0.0], [2.0, 4.0, 0.0], [0.0, 0.0, 1.0]];
        assert!(invert(&singular).is_none());
    }

    #[test]
    fn test_rotate_zero_and_half_turn() {
        let img = gradient(5, 3);
        let mut params = Rotate.parameters();
        assert_eq!(Rotate.transform(&params, &img), img);

        params.set_raw("theta", "180").unwrap();
        let out = Rotate.transform(&params, &img);
        assert_eq!(out.get_pixel(0, 0), img.get_pixel(4, 2));
        assert_eq!(out.get_pixel(3, 1), img.get_pixel(1, 1));
    }

    #[test]
    fn test_rotate_is_counter_clockwise() {
        let mut img = Raster::new(3, 3);
        img.put_pixel(2, 1, Rgb([255, 255, 255]));
        let mut params = Rotate.parameters();
        params.set_raw("theta", "90").unwrap();
        let out = Rotate.transform(&params, &img);
        assert_eq!(out.get_pixel(1, 0).0, [255, 255, 255]);
        assert_eq!(out.get_pixel(2, 1).0, [0, 0, 0]);
    }

    #[test]
    fn test_affine_defaults_to_identity() {
        let img = gradient(4, 4);
        assert_eq!(Affine.transform(&Affine.parameters(), &img), img);
        assert_eq!(Perspective.transform(&Perspective.parameters(), &img), img);
    }

    #[test]
    fn test_affine_translation_and_inverse_map() {
        let img = gradient(5, 2);
        let mut params = Affine.parameters();
        params.set_raw("M13", "2").unwrap();
        let out = Affine.transform(&params, &img);
        assert_eq!(out.get_pixel(3, 1), img.get_pixel(1, 1));
        assert_eq!(out.get_pixel(1, 0).0, [0, 0, 0]);

        params.set_raw("inverse_map", "true").unwrap();
        let out = Affine.transform(&params, &img);
        assert_eq!(out.get_pixel(1, 1), img.get_pixel(3, 1));
    }

    #[test]
    fn test_singular_matrix_is_black() {
        let img = gradient(4, 3);
        let mut params = Affine.parameters();
        params.set_raw("M11", "0").unwrap();
        let out = Affine.transform(&params, &img);
        assert_eq!(out.dimensions(), (4, 3));
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_perspective_scale() {
        let img = gradient(5, 5);
        let mut params = Perspective.parameters();
        params.set_raw("M33", "2").unwrap();
        params.set_raw("flags", "nearest").unwrap();
        let out = Perspective.transform(&params, &img);
        assert_eq!(out.get_pixel(1, 1), img.get_pixel(2, 2));
        assert_eq!(out.get_pixel(2, 0), img.get_pixel(4, 0));
    }

    #[test]
    fn test_warp_polar_origin_column_is_center() {
        let mut img = Raster::from_pixel(5, 5, Rgb([10, 10, 10]));
        img.put_pixel(2, 2, Rgb([250, 0, 0]));
        let out = WarpPolar.transform(&WarpPolar.parameters(), &img);
        for y in 0..5 {
            assert_eq!(out.get_pixel(0, y).0, [250, 0, 0]);
        }
    }

    #[test]
    fn test_warp_polar_inverse_center_reads_origin() {
        let img = gradient(5, 5);
        let mut params = WarpPolar.parameters();
        params.set_raw("INVERSE_MAP", "true").unwrap();
        params.set_raw("POLAR_LOG", "true").unwrap();
        let out = WarpPolar.transform(&params, &img);
        assert_eq!(out.get_pixel(2, 2), img.get_pixel(0, 0));
    }

    #[test]
    fn test_border_value_fills_outside() {
        let img = gradient(5, 2);
        let mut params = Affine.parameters();
        params.set_raw("M13", "2").unwrap();
        params.set_raw("border_value", "200").unwrap();
        let out = Affine.transform(&params, &img);
        assert_eq!(out.get_pixel(0, 0).0, [200, 200, 200]);
        assert_eq!(out.get_pixel(3, 1), img.get_pixel(1, 1));

        params.set_raw("border_value", "999").unwrap();
        assert_eq!(params.get_integer("border_value"), Some(255));

        params.set_raw("border_mode", "replicate").unwrap();
        let out = Affine.transform(&params, &img);
        assert_eq!(out.get_pixel(0, 0), img.get_pixel(0, 0));
    }

    #[test]
    fn test_near_degenerate_perspective_finishes() {
        let img = gradient(32, 24);
        let mut params = Perspective.parameters();
        params.set_raw("inverse_map", "true").unwrap();
        params.set_raw("M33", "0.000000001").unwrap();
        params.set_raw("border_mode", "reflect-101").unwrap();

        for flags in ["nearest", "linear", "lanczos4"] {
            params.set_raw("flags", flags).unwrap();
            let start = std::time::Instant::now();
            let out = Perspective.transform(&params, &img);
            assert_eq!(out.dimensions(), (32, 24));
            assert!(start.elapsed() < std::time::Duration::from_secs(5), "{}", flags);
        }
    }
}
