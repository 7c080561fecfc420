//! Image decode/encode collaborators.
//!
//! Rasters are always 8-bit RGB in memory. On the way out the file
//! extension picks the codec; grayscale-only extensions are collapsed to
//! luma first and PNG honors the configured compression.

use crate::config::ExportConfig;
use crate::core::error::{ImageIoError, ImageIoResult};
use crate::core::types::Raster;
use image::codecs::png::{FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Read an image file into a raster.
pub fn decode(path: impl AsRef<Path>) -> ImageIoResult<Raster> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|e| ImageIoError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let raster = image.to_rgb8();
    log::info!(
        "decoded {} ({}x{})",
        path.display(),
        raster.width(),
        raster.height()
    );
    Ok(raster)
}

/// Write `raster` to `path`, choosing the codec from the extension.
pub fn encode(raster: &Raster, path: impl AsRef<Path>, config: &ExportConfig) -> ImageIoResult<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ImageIoError::UnsupportedExtension {
            path: path.to_path_buf(),
        })?;
    let format = ImageFormat::from_extension(&extension).ok_or_else(|| {
        ImageIoError::UnsupportedExtension {
            path: path.to_path_buf(),
        }
    })?;

    let encode_error = |reason: String| ImageIoError::Encode {
        path: path.to_path_buf(),
        reason,
    };

    let image = if config.is_grayscale(&extension) {
        DynamicImage::ImageLuma8(image::imageops::grayscale(raster))
    } else {
        DynamicImage::ImageRgb8(raster.clone())
    };

    if format == ImageFormat::Png {
        let file = File::create(path).map_err(|e| encode_error(e.to_string()))?;
        let encoder = PngEncoder::new_with_quality(
            BufWriter::new(file),
            config.png_compression.into(),
            FilterType::Adaptive,
        );
        image
            .write_with_encoder(encoder)
            .map_err(|e| encode_error(e.to_string()))?;
    } else {
        image
            .save_with_format(path, format)
            .map_err(|e| encode_error(e.to_string()))?;
    }

    log::info!("encoded {} as {:?}", path.display(), format);
    Ok(())
}
