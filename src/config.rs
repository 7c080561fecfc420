//! Editor configuration.
//!
//! Loaded from TOML; every section and field is optional and falls back to
//! its default:
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [export]
//! png_compression = "fast"
//! grayscale_extensions = ["pgm", "pbm"]
//!
//! [pipeline]
//! max_units = 32
//! ```

use crate::core::error::ConfigError;
use crate::pipeline::{Pipeline, DEFAULT_MAX_UNITS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub logging: LoggingConfig,
    pub export: ExportConfig,
    pub pipeline: PipelineConfig,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// PNG compression effort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PngCompression {
    #[default]
    Best,
    Default,
    Fast,
}

impl From<PngCompression> for image::codecs::png::CompressionType {
    fn from(value: PngCompression) -> Self {
        match value {
            PngCompression::Best => Self::Best,
            PngCompression::Default => Self::Default,
            PngCompression::Fast => Self::Fast,
        }
    }
}

/// How derived images are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub png_compression: PngCompression,
    /// Extensions collapsed to single-channel luma before encoding
    pub grayscale_extensions: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            png_compression: PngCompression::Best,
            grayscale_extensions: vec!["pgm".to_string()],
        }
    }
}

impl ExportConfig {
    /// Whether `extension` is written as grayscale.
    pub fn is_grayscale(&self, extension: &str) -> bool {
        self.grayscale_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}

/// Pipeline limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub max_units: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_units: DEFAULT_MAX_UNITS,
        }
    }
}

impl PipelineConfig {
    /// An empty pipeline honoring these limits.
    pub fn build(&self) -> Pipeline {
        Pipeline::with_max_units(self.max_units)
    }
}

impl EditorConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }
}
