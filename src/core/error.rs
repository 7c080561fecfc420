//! Error types for Filterbench.
//!
//! Uses thiserror for structured errors with context. Parameter and
//! pipeline errors are serializable and name the offending unit index or
//! parameter; reacting to them is left to the caller.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Filterbench.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum FilterbenchError {
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Image I/O error: {0}")]
    ImageIo(#[from] ImageIoError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while reading or writing a filter parameter.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterError {
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Unknown parameter '{name}'")]
    UnknownParameter { name: String },

    #[error("Invalid choice list: {reason}")]
    InvalidChoices { reason: String },
}

/// Errors from pipeline editing operations.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipelineError {
    #[error("Index {index} is out of range for a pipeline of {len} unit(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unknown filter '{id}'")]
    UnknownFilter { id: String },

    #[error("Pipeline is full ({max} units)")]
    CapacityExceeded { max: usize },

    #[error("No source image has been loaded")]
    NoSource,

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

/// Errors from the image decode/encode collaborator.
#[derive(Error, Debug)]
pub enum ImageIoError {
    #[error("Failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to encode {}: {reason}", path.display())]
    Encode { path: PathBuf, reason: String },

    #[error("No encoder for the extension of {}", path.display())]
    UnsupportedExtension { path: PathBuf },
}

/// Errors while loading an [`EditorConfig`](crate::config::EditorConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Error Utilities
// ============================================================================

impl ParameterError {
    /// Shorthand for an [`ParameterError::InvalidParameter`].
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ParameterError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`ParameterError::UnknownParameter`].
    pub fn unknown(name: impl Into<String>) -> Self {
        ParameterError::UnknownParameter { name: name.into() }
    }

    /// Name of the parameter this error refers to, if any.
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            ParameterError::InvalidParameter { name, .. }
            | ParameterError::UnknownParameter { name } => Some(name),
            ParameterError::InvalidChoices { .. } => None,
        }
    }

    /// Re-attribute an invalid-value error to the parameter `name`.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        match self {
            ParameterError::InvalidParameter { reason, .. } => ParameterError::InvalidParameter {
                name: name.into(),
                reason,
            },
            other => other,
        }
    }
}

impl PipelineError {
    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            PipelineError::IndexOutOfRange { len: 0, .. } => {
                Some("Add a filter before editing the pipeline".to_string())
            }
            PipelineError::IndexOutOfRange { len, .. } => {
                Some(format!("Use an index between 0 and {}", len - 1))
            }
            PipelineError::UnknownFilter { .. } => {
                Some("Run `filterbench list` to see available filters".to_string())
            }
            PipelineError::NoSource => Some("Load an image first".to_string()),
            PipelineError::Parameter(ParameterError::UnknownParameter { name }) => Some(format!(
                "Check the filter schema; '{}' is not one of its parameters",
                name
            )),
            _ => None,
        }
    }
}

/// Result type alias for Filterbench operations.
pub type FilterbenchResult<T> = Result<T, FilterbenchError>;

/// Result type alias for parameter operations.
pub type ParameterResult<T> = Result<T, ParameterError>;

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type alias for image I/O.
pub type ImageIoResult<T> = Result<T, ImageIoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_range_suggestion() {
        let error = PipelineError::IndexOutOfRange { index: 5, len: 3 };
        assert!(error.suggested_fix().unwrap().contains("0 and 2"));

        let error = PipelineError::IndexOutOfRange { index: 0, len: 0 };
        assert!(error.suggested_fix().unwrap().contains("Add a filter"));
    }

    #[test]
    fn test_parameter_error_wraps_into_pipeline_error() {
        let error: PipelineError = ParameterError::unknown("sigma").into();
        assert_eq!(error.to_string(), "Unknown parameter 'sigma'");
        assert!(error.suggested_fix().unwrap().contains("sigma"));
    }

    #[test]
    fn test_parameter_name() {
        let error = ParameterError::invalid("channel", "not an option");
        assert_eq!(error.parameter_name(), Some("channel"));
        let error = ParameterError::InvalidChoices { reason: "empty".into() };
        assert_eq!(error.parameter_name(), None);
    }

    #[test]
    fn test_with_name_renames_invalid_values_only() {
        let error = ParameterError::invalid("choice", "bad").with_name("border_type");
        assert_eq!(error, ParameterError::invalid("border_type", "bad"));
        let error = ParameterError::unknown("sigma").with_name("other");
        assert_eq!(error, ParameterError::unknown("sigma"));
    }
}
