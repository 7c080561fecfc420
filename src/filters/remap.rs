//! Inverse-mapped resampling used by the geometric warps.
//!
//! A warp supplies, for every output pixel, the source coordinate it comes
//! from. The sampler then reads the source with the requested
//! interpolation kernel, resolving out-of-image taps through a
//! [`BorderType`]. Under [`BorderType::Constant`] those taps read `fill`
//! on every channel.

use crate::core::types::Raster;
use crate::filters::kernel::{from_rows, saturate};
use crate::filters::options::{BorderType, Interpolation};
use std::f64::consts::PI;

const CHANNELS: usize = 3;
const CUBIC_A: f64 = -0.75;
/// Source coordinates are clamped to this magnitude before tap indexing.
/// Far beyond any raster, so border resolution is unaffected.
const MAX_COORDINATE: f64 = 1e15;

/// Resample `src` into a `width x height` raster.
///
/// `map` returns the source coordinate of output pixel `(x, y)`, or `None`
/// to leave the pixel black.
pub fn remap<M>(
    src: &Raster,
    width: u32,
    height: u32,
    map: M,
    interpolation: Interpolation,
    border: BorderType,
    fill: u8,
) -> Raster
where
    M: Fn(f64, f64) -> Option<(f64, f64)> + Sync,
{
    let interpolation = interpolation.for_warp();
    from_rows(width, height, |y, row| {
        for x in 0..width as usize {
            let Some((sx, sy)) = map(x as f64, y as f64) else {
                continue;
            };
            if let Some(px) = sample(src, sx, sy, interpolation, border, fill) {
                row[x * CHANNELS..(x + 1) * CHANNELS].copy_from_slice(&px);
            }
        }
    })
}

/// Read `src` at a fractional coordinate.
///
/// Returns `None` when a transparent border suppresses the sample.
pub fn sample(
    src: &Raster,
    sx: f64,
    sy: f64,
    interpolation: Interpolation,
    border: BorderType,
    fill: u8,
) -> Option<[u8; CHANNELS]> {
    if !sx.is_finite() || !sy.is_finite() {
        return constant_fill(border, fill);
    }

    if interpolation == Interpolation::Nearest {
        let (x, y) = (split(sx.round()).0, split(sy.round()).0);
        return tap(src, x, y, border).or_else(|| constant_fill(border, fill));
    }

    let (x0, fx) = split(sx);
    let (y0, fy) = split(sy);
    let (start, wx) = weights(interpolation, fx);
    let (_, wy) = weights(interpolation, fy);

    let mut acc = [0f64; CHANNELS];
    for (j, ky) in wy.iter().enumerate() {
        for (i, kx) in wx.iter().enumerate() {
            let k = kx * ky;
            if k == 0.0 {
                continue;
            }
            let tx = x0.saturating_add(start + i as i64);
            let ty = y0.saturating_add(start + j as i64);
            let px = match tap(src, tx, ty, border) {
                Some(px) => px,
                None => constant_fill(border, fill)?,
            };
            for c in 0..CHANNELS {
                acc[c] += k * px[c] as f64;
            }
        }
    }
    Some(acc.map(|v| saturate(v as f32)))
}

fn constant_fill(border: BorderType, fill: u8) -> Option<[u8; CHANNELS]> {
    (border != BorderType::Transparent).then_some([fill; CHANNELS])
}

/// Fetch one source pixel after border resolution.
fn tap(src: &Raster, x: i64, y: i64, border: BorderType) -> Option<[u8; CHANNELS]> {
    let (w, h) = src.dimensions();
    let sx = border.resolve(x, w as i64)?;
    let sy = border.resolve(y, h as i64)?;
    Some(src.get_pixel(sx as u32, sy as u32).0)
}

fn split(v: f64) -> (i64, f64) {
    let base = v.clamp(-MAX_COORDINATE, MAX_COORDINATE).floor();
    (base as i64, (v - base).clamp(0.0, 1.0))
}

/// Tap weights for a fractional offset `t` in `[0, 1)`.
///
/// Returns the offset of the first tap relative to `floor(coordinate)` and
/// the weights, which always sum to one.
fn weights(interpolation: Interpolation, t: f64) -> (i64, Vec<f64>) {
    match interpolation {
        Interpolation::Cubic => (-1, cubic_weights(t).to_vec()),
        Interpolation::Lanczos4 => (-3, lanczos4_weights(t).to_vec()),
        _ => (0, vec![1.0 - t, t]),
    }
}

fn cubic_weights(t: f64) -> [f64; 4] {
    let a = CUBIC_A;
    let w0 = ((a * (t + 1.0) - 5.0 * a) * (t + 1.0) + 8.0 * a) * (t + 1.0) - 4.0 * a;
    let w1 = ((a + 2.0) * t - (a + 3.0)) * t * t + 1.0;
    let w2 = ((a + 2.0) * (1.0 - t) - (a + 3.0)) * (1.0 - t) * (1.0 - t) + 1.0;
    [w0, w1, w2, 1.0 - w0 - w1 - w2]
}

fn lanczos4_weights(t: f64) -> [f64; 8] {
    let mut w = [0f64; 8];
    let mut sum = 0.0;
    for (i, wi) in w.iter_mut().enumerate() {
        let d = t + 3.0 - i as f64;
        *wi = if d.abs() < f64::EPSILON {
            1.0
        } else {
            let a = PI * d;
            let b = a / 4.0;
            (a.sin() / a) * (b.sin() / b)
        };
        sum += *wi;
    }
    w.map(|v| v / sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn checker() -> Raster {
        Raster::from_fn(6, 5, |x, y| {
            let v = ((x * 37 + y * 91) % 256) as u8;
            Rgb([v, 255 - v, v / 3])
        })
    }

    #[test]
    fn test_weights_sum_to_one() {
        for t in [0.0, 0.25, 0.5, 0.9] {
            let cubic: f64 = cubic_weights(t).iter().sum();
            let lanczos: f64 = lanczos4_weights(t).iter().sum();
            assert!((cubic - 1.0).abs() < 1e-9);
            assert!((lanczos - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_identity_map_is_exact_for_every_kernel() {
        let img = checker();
        for interpolation in [
            Interpolation::Nearest,
            Interpolation::Linear,
            Interpolation::Cubic,
            Interpolation::Lanczos4,
        ] {
            let out = remap(
                &img,
                6,
                5,
                |x, y| Some((x, y)),
                interpolation,
                BorderType::Reflect101,
                0,
            );
            assert_eq!(out, img, "{:?}", interpolation);
        }
    }

    #[test]
    fn test_linear_midpoint() {
        let img = Raster::from_fn(2, 1, |x, _| if x == 0 { Rgb([0, 0, 0]) } else { Rgb([100, 200, 50]) });
        let px = sample(&img, 0.5, 0.0, Interpolation::Linear, BorderType::Replicate, 0).unwrap();
        assert_eq!(px, [50, 100, 25]);
    }

    #[test]
    fn test_outside_constant_and_transparent() {
        let img = checker();
        assert_eq!(
            sample(&img, -10.0, 2.0, Interpolation::Nearest, BorderType::Constant, 0),
            Some([0, 0, 0])
        );
        assert_eq!(
            sample(&img, -10.0, 2.0, Interpolation::Linear, BorderType::Transparent, 0),
            None
        );
        assert_eq!(
            sample(&img, f64::NAN, 2.0, Interpolation::Linear, BorderType::Constant, 0),
            Some([0, 0, 0])
        );
    }

    #[test]
    fn test_unmapped_pixels_stay_black() {
        let img = checker();
        let out = remap(&img, 3, 3, |_, _| None, Interpolation::Linear, BorderType::Replicate, 0);
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_constant_border_uses_fill() {
        let img = checker();
        for interpolation in [Interpolation::Nearest, Interpolation::Linear, Interpolation::Cubic] {
            assert_eq!(
                sample(&img, -10.0, -10.0, interpolation, BorderType::Constant, 77),
                Some([77, 77, 77]),
                "{:?}",
                interpolation
            );
        }
        assert_eq!(
            sample(&img, f64::INFINITY, 0.0, Interpolation::Linear, BorderType::Constant, 9),
            Some([9, 9, 9])
        );
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let img = checker();
        for v in [9.2e18, -9.2e18, f64::MAX, f64::MIN, 1e300] {
            for interpolation in [
                Interpolation::Nearest,
                Interpolation::Linear,
                Interpolation::Cubic,
                Interpolation::Lanczos4,
            ] {
                for border in [BorderType::Reflect101, BorderType::Wrap, BorderType::Replicate] {
                    assert!(sample(&img, v, -v, interpolation, border, 0).is_some());
                }
            }
        }
    }
}
