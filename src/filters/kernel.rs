//! Neighborhood operations shared by the blur, morphology and convolution
//! filters.
//!
//! All kernels here are correlations (the kernel is not flipped) and honor
//! a [`BorderType`] for samples that fall outside the image. Rows are
//! computed in parallel; the result is identical to a sequential pass.

use crate::core::types::Raster;
use crate::filters::options::BorderType;
use rayon::prelude::*;

const CHANNELS: usize = 3;

/// Build a raster by filling each output row independently.
pub(crate) fn from_rows<F>(width: u32, height: u32, fill: F) -> Raster
where
    F: Fn(i64, &mut [u8]) + Sync,
{
    let row_len = width as usize * CHANNELS;
    let mut buf = vec![0u8; row_len * height as usize];
    if row_len > 0 {
        buf.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| fill(y as i64, row));
    }
    Raster::from_raw(width, height, buf).unwrap_or_else(|| Raster::new(width, height))
}

/// Round and saturate to a channel byte.
pub(crate) fn saturate(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Apply a separable kernel: `kx` along rows, then `ky` along columns.
///
/// Each kernel is anchored at its middle tap (`len / 2`).
pub fn separable(src: &Raster, kx: &[f32], ky: &[f32], border: BorderType) -> Raster {
    let (w, h) = src.dimensions();
    let (wi, hi) = (w as i64, h as i64);
    let raw = src.as_raw();
    let row_len = w as usize * CHANNELS;
    let ax = (kx.len() / 2) as i64;
    let ay = (ky.len() / 2) as i64;

    // Horizontal pass into a float buffer so rounding happens once.
    let mut horizontal = vec![0f32; row_len * h as usize];
    if row_len > 0 {
        horizontal
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| {
                let src_row = &raw[y * row_len..(y + 1) * row_len];
                for x in 0..wi {
                    let mut acc = [0f32; CHANNELS];
                    for (i, k) in kx.iter().enumerate() {
                        if let Some(sx) = border.resolve(x + i as i64 - ax, wi) {
                            let p = sx as usize * CHANNELS;
                            for c in 0..CHANNELS {
                                acc[c] += k * src_row[p + c] as f32;
                            }
                        }
                    }
                    let o = x as usize * CHANNELS;
                    row[o..o + CHANNELS].copy_from_slice(&acc);
                }
            });
    }

    from_rows(w, h, |y, row| {
        for x in 0..row_len {
            let mut acc = 0f32;
            for (j, k) in ky.iter().enumerate() {
                if let Some(sy) = border.resolve(y + j as i64 - ay, hi) {
                    acc += k * horizontal[sy as usize * row_len + x];
                }
            }
            row[x] = saturate(acc);
        }
    })
}

/// Correlate with a dense `kw x kh` kernel anchored at `(ax, ay)` and add
/// `delta` to every output sample.
pub fn filter2d(
    src: &Raster,
    kernel: &[f32],
    kw: usize,
    anchor: (i64, i64),
    delta: f32,
    border: BorderType,
) -> Raster {
    let (w, h) = src.dimensions();
    let (wi, hi) = (w as i64, h as i64);
    let kh = if kw == 0 { 0 } else { kernel.len() / kw };
    let (ax, ay) = anchor;

    from_rows(w, h, |y, row| {
        for x in 0..wi {
            let mut acc = [delta; CHANNELS];
            for j in 0..kh {
                let Some(sy) = border.resolve(y + j as i64 - ay, hi) else {
                    continue;
                };
                for i in 0..kw {
                    let k = kernel[j * kw + i];
                    if k == 0.0 {
                        continue;
                    }
                    let Some(sx) = border.resolve(x + i as i64 - ax, wi) else {
                        continue;
                    };
                    let p = src.get_pixel(sx as u32, sy as u32).0;
                    for c in 0..CHANNELS {
                        acc[c] += k * p[c] as f32;
                    }
                }
            }
            let o = x as usize * CHANNELS;
            for c in 0..CHANNELS {
                row[o + c] = saturate(acc[c]);
            }
        }
    })
}

/// Per-channel minimum (`take_max == false`) or maximum over the set
/// cells of a binary structuring element anchored at `anchor`.
///
/// Samples outside the image under a constant border are neutral: they
/// never win the comparison.
pub fn morph_extreme(
    src: &Raster,
    element: &[bool],
    ew: usize,
    anchor: (i64, i64),
    border: BorderType,
    take_max: bool,
) -> Raster {
    let (w, h) = src.dimensions();
    let (wi, hi) = (w as i64, h as i64);
    let eh = if ew == 0 { 0 } else { element.len() / ew };
    let (ax, ay) = anchor;
    let neutral = if take_max { u8::MIN } else { u8::MAX };

    from_rows(w, h, |y, row| {
        for x in 0..wi {
            let mut best = [neutral; CHANNELS];
            let mut seen = false;
            for j in 0..eh {
                let Some(sy) = border.resolve(y + j as i64 - ay, hi) else {
                    continue;
                };
                for i in 0..ew {
                    if !element[j * ew + i] {
                        continue;
                    }
                    let Some(sx) = border.resolve(x + i as i64 - ax, wi) else {
                        continue;
                    };
                    seen = true;
                    let p = src.get_pixel(sx as u32, sy as u32).0;
                    for c in 0..CHANNELS {
                        best[c] = if take_max {
                            best[c].max(p[c])
                        } else {
                            best[c].min(p[c])
                        };
                    }
                }
            }
            // An empty element leaves the pixel as it was.
            if !seen {
                best = src.get_pixel(x as u32, y as u32).0;
            }
            let o = x as usize * CHANNELS;
            row[o..o + CHANNELS].copy_from_slice(&best);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn ramp() -> Raster {
        Raster::from_fn(4, 3, |x, y| {
            let v = (x * 10 + y * 50) as u8;
            Rgb([v, v / 2, 255 - v])
        })
    }

    #[test]
    fn test_identity_separable() {
        let img = ramp();
        let out = separable(&img, &[1.0], &[1.0], BorderType::Reflect101);
        assert_eq!(out, img);
    }

    #[test]
    fn test_identity_filter2d() {
        let img = ramp();
        let kernel = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        let out = filter2d(&img, &kernel, 3, (1, 1), 0.0, BorderType::Constant);
        assert_eq!(out, img);
    }

    #[test]
    fn test_filter2d_delta_saturates() {
        let img = ramp();
        let out = filter2d(&img, &[1.0], 1, (0, 0), 300.0, BorderType::Reflect101);
        assert!(out.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_box_average_constant_border() {
        let img = Raster::from_pixel(3, 1, Rgb([90, 90, 90]));
        let third = 1.0 / 3.0;
        let out = separable(&img, &[third; 3], &[1.0], BorderType::Constant);
        assert_eq!(out.get_pixel(0, 0).0, [60, 60, 60]);
        assert_eq!(out.get_pixel(1, 0).0, [90, 90, 90]);
    }

    #[test]
    fn test_morph_extreme() {
        let mut img = Raster::from_pixel(3, 3, Rgb([0, 0, 0]));
        img.put_pixel(1, 1, Rgb([200, 100, 50]));
        let element = [true; 9];

        let dilated = morph_extreme(&img, &element, 3, (1, 1), BorderType::Constant, true);
        assert!(dilated.pixels().all(|p| p.0 == [200, 100, 50]));

        let eroded = morph_extreme(&img, &element, 3, (1, 1), BorderType::Constant, false);
        assert!(eroded.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_empty_image() {
        let img = Raster::new(0, 0);
        let out = separable(&img, &[0.5, 0.5], &[1.0], BorderType::Reflect101);
        assert_eq!(out.dimensions(), (0, 0));
    }
}
