//! Parameter schema: the declared, ordered description of a filter's
//! parameters.
//!
//! The schema is what a presentation layer renders editing widgets from.
//! It is derived from a filter's default [`ParameterSet`], so declarations
//! and defaults can never drift apart.

use crate::core::params::{Parameter, ParameterSet};
use crate::core::types::{ParamKind, Value};
use serde::{Deserialize, Serialize};

/// UI hints for parameter display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "widget", content = "options")]
pub enum UiHint {
    /// Slider paired with a spin box for bounded numerics
    Slider {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
        /// Increment
        step: f64,
    },
    /// Dropdown or radio group for selecting one option
    Dropdown {
        /// Available options
        options: Vec<String>,
    },
    /// Checkbox for booleans
    Checkbox,
}

/// Definition of one filter parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterDefinition {
    /// Unique name within the filter (stable key)
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// Kind tag
    pub kind: ParamKind,
    /// Value a new unit starts with
    pub default_value: Value,
    /// UI widget hint
    pub ui_hint: UiHint,
}

/// Ordered list of parameter definitions, `active` first.
pub type Schema = Vec<ParameterDefinition>;

impl ParameterDefinition {
    /// Describe one parameter slot.
    pub fn describe(name: &str, param: &Parameter) -> Self {
        let ui_hint = match param {
            Parameter::Integer(p) => UiHint::Slider {
                min: p.min() as f64,
                max: p.max() as f64,
                step: p.step() as f64,
            },
            Parameter::Double(p) => UiHint::Slider {
                min: p.min(),
                max: p.max(),
                step: p.step(),
            },
            Parameter::Choice(p) => UiHint::Dropdown {
                options: p.options().map(str::to_string).collect(),
            },
            Parameter::Flag(_) => UiHint::Checkbox,
        };

        Self {
            display_name: name_to_display(name),
            name: name.to_string(),
            kind: param.kind(),
            default_value: param.value(),
            ui_hint,
        }
    }

    /// Describe every slot of a parameter set, in declaration order.
    pub fn describe_all(params: &ParameterSet) -> Schema {
        params
            .iter()
            .map(|(name, param)| Self::describe(name, param))
            .collect()
    }
}

/// Convert snake_case name to Title Case display name.
///
/// Upper-case names such as `M11` or `POLAR_LOG` are kept as written.
fn name_to_display(name: &str) -> String {
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        return name.replace('_', " ");
    }
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
