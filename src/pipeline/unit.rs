//! Filter unit: one configured stage of a pipeline.

use crate::core::error::ParameterResult;
use crate::core::params::ParameterSet;
use crate::core::schema::{ParameterDefinition, Schema};
use crate::core::types::{Raster, UnitId, Value};
use crate::filters::catalog::FilterKind;
use std::borrow::Cow;

/// A filter kind together with its own parameter values.
#[derive(Debug, Clone)]
pub struct FilterUnit {
    id: UnitId,
    kind: FilterKind,
    params: ParameterSet,
}

impl FilterUnit {
    /// New unit of `kind` with default parameters.
    pub fn new(kind: FilterKind) -> Self {
        Self {
            id: UnitId::new(),
            kind,
            params: kind.default_parameters(),
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Display name of the unit's kind.
    pub fn name(&self) -> String {
        self.kind.name()
    }

    /// Declared parameters with their current values as defaults.
    pub fn schema(&self) -> Schema {
        ParameterDefinition::describe_all(&self.params)
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    pub fn get_parameter(&self, name: &str) -> ParameterResult<Value> {
        self.params.value(name)
    }

    /// Parse `raw` according to the declared kind of `name` and assign it.
    ///
    /// Numbers are clamped into range; only unknown names and unparsable or
    /// out-of-set values are errors.
    pub fn set_parameter(&mut self, name: &str, raw: &str) -> ParameterResult<()> {
        self.params.set_raw(name, raw)
    }

    /// Assign an already typed value.
    pub fn set_value(&mut self, name: &str, value: &Value) -> ParameterResult<()> {
        self.params.set(name, value)
    }

    pub fn is_active(&self) -> bool {
        self.params.is_active()
    }

    /// Run the unit on `image`; an inactive unit borrows its input back.
    pub fn process<'a>(&self, image: &'a Raster) -> Cow<'a, Raster> {
        if self.is_active() {
            Cow::Owned(self.kind.op().transform(&self.params, image))
        } else {
            Cow::Borrowed(image)
        }
    }

    /// Apply the unit, always producing a new raster.
    pub fn apply(&self, image: &Raster) -> Raster {
        self.process(image).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ParameterError;
    use crate::core::params::ACTIVE;
    use image::Rgb;

    fn sample() -> Raster {
        Raster::from_fn(4, 3, |x, y| Rgb([(x * 60) as u8, (y * 90) as u8, 200]))
    }

    #[test]
    fn test_new_unit_defaults() {
        let unit = FilterUnit::new(FilterKind::GammaCorrect);
        assert_eq!(unit.name(), "Gamma Correct");
        assert!(unit.is_active());
        assert_eq!(unit.get_parameter("gamma").unwrap(), Value::Float(1.0));
        assert_eq!(unit.schema()[0].name, ACTIVE);
    }

    #[test]
    fn test_ids_are_distinct() {
        let a = FilterUnit::new(FilterKind::Invert);
        let b = FilterUnit::new(FilterKind::Invert);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn test_set_parameter_errors() {
        let mut unit = FilterUnit::new(FilterKind::SplitChannel);
        assert_eq!(
            unit.set_parameter("gamma", "2"),
            Err(ParameterError::unknown("gamma"))
        );
        assert!(matches!(
            unit.set_parameter("channel", "Purple"),
            Err(ParameterError::InvalidParameter { .. })
        ));
        unit.set_parameter("channel", "Green").unwrap();
        assert_eq!(
            unit.get_parameter("channel").unwrap(),
            Value::String("Green".to_string())
        );
    }

    #[test]
    fn test_set_parameter_clamps() {
        let mut unit = FilterUnit::new(FilterKind::Threshold);
        unit.set_parameter("threshold", "999").unwrap();
        assert_eq!(unit.get_parameter("threshold").unwrap(), Value::Integer(255));
        unit.set_value("threshold", &Value::Integer(-4)).unwrap();
        assert_eq!(unit.get_parameter("threshold").unwrap(), Value::Integer(0));
    }

    #[test]
    fn test_schema_reflects_current_values() {
        let mut unit = FilterUnit::new(FilterKind::BoxBlur);
        unit.set_parameter("kernel_width", "9").unwrap();
        let width = unit
            .schema()
            .into_iter()
            .find(|d| d.name == "kernel_width")
            .unwrap();
        assert_eq!(width.default_value, Value::Integer(9));
    }

    #[test]
    fn test_inactive_is_identity_for_every_kind() {
        let img = sample();
        for kind in FilterKind::ALL {
            let mut unit = FilterUnit::new(*kind);
            unit.set_parameter(ACTIVE, "false").unwrap();
            assert_eq!(unit.apply(&img), img, "{}", kind);
            assert!(matches!(unit.process(&img), Cow::Borrowed(_)));
        }
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let img = sample();
        let copy = img.clone();
        for kind in FilterKind::ALL {
            let out = FilterUnit::new(*kind).apply(&img);
            assert_eq!(out.dimensions(), img.dimensions(), "{}", kind);
        }
        assert_eq!(img, copy);
    }
}
