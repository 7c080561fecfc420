//! Core types and traits for the filterbench image pipeline.
//!
//! This module contains the foundational types every filter and pipeline is
//! built from:
//! - Value and raster types
//! - Bounded and enumerated parameters
//! - Parameter schema and UI hints
//! - The `FilterOp` trait and filter metadata
//! - Error types

pub mod error;
pub mod filter;
pub mod params;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use error::{
    ConfigError, FilterbenchError, FilterbenchResult, ImageIoError, ParameterError,
    PipelineError,
};
pub use filter::{Category, FilterMetadata, FilterOp};
pub use params::{BoundedDouble, BoundedInteger, ChoiceSet, Parameter, ParameterSet, RadioSelect};
pub use schema::{ParameterDefinition, Schema, UiHint};
pub use types::{ParamKind, Raster, UnitId, Value};
