//! Self-clamping parameter holders used by every filter's configuration.
//!
//! Numeric parameters silently clamp on assignment; choice parameters
//! reject labels outside their declared set. A [`ParameterSet`] keeps a
//! filter's parameters in declaration order so they can be enumerated and
//! edited generically.

use crate::core::error::{ParameterError, ParameterResult};
use crate::core::types::{ParamKind, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of the flag every filter carries.
pub const ACTIVE: &str = "active";

/// Initial state of the `active` flag on a freshly created filter unit.
pub const DEFAULT_ACTIVE: bool = true;

/// Floating point parameter held inside `[min, max]`.
///
/// `set_min`/`set_max` replace a bound without re-clamping the current
/// value; the value is only brought back into range on the next
/// `set_value`. Deserialization counts as such a write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoundedDoubleState")]
pub struct BoundedDouble {
    value: f64,
    min: f64,
    max: f64,
    step: f64,
}

/// Integer parameter held inside `[min, max]`.
///
/// Same bound semantics as [`BoundedDouble`]; fractional input is
/// truncated before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BoundedIntegerState")]
pub struct BoundedInteger {
    value: i64,
    min: i64,
    max: i64,
    step: i64,
}

/// One-of-many string choice.
///
/// Keeps a label -> selected map for UI binding; exactly one entry is
/// `true` at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RadioSelectState")]
pub struct RadioSelect {
    settings: IndexMap<String, bool>,
    value: String,
}

/// A closed set of choice labels backed by a Rust enum.
///
/// Filters declare their choice parameters from these so every selectable
/// label maps to a typed option when the filter runs.
pub trait ChoiceSet: Copy + PartialEq + 'static {
    /// Every option, in display order.
    const ALL: &'static [Self];

    /// Stable label shown to users and stored in the [`RadioSelect`].
    fn label(self) -> &'static str;

    /// Parse a label back into the option.
    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }
}

/// A single typed parameter slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "state")]
pub enum Parameter {
    Integer(BoundedInteger),
    Double(BoundedDouble),
    Choice(RadioSelect),
    Flag(bool),
}

/// Ordered parameter map owned by one filter unit.
///
/// Declaration order is preserved for UI layout. The `active` flag is
/// always present and always first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParameterSetState")]
pub struct ParameterSet {
    params: IndexMap<String, Parameter>,
}

/// Label used in errors raised by a choice outside any [`ParameterSet`].
const CHOICE: &str = "choice";

/// Clamp without panicking when a lazily replaced bound left `min > max`.
fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

fn clamp_i64(value: i64, min: i64, max: i64) -> i64 {
    value.max(min).min(max)
}

// ============================================================================
// BoundedDouble
// ============================================================================

impl BoundedDouble {
    /// Create a bounded double; `value` is clamped into `[min, max]`.
    pub fn new(value: f64, min: f64, max: f64) -> Self {
        let mut bounded = Self {
            value: min,
            min,
            max,
            step: 0.1,
        };
        bounded.set_value(value);
        bounded
    }

    /// Set the UI increment.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Store `value` clamped into `[min, max]`. NaN lands on `min`.
    pub fn set_value(&mut self, value: f64) {
        self.value = clamp_f64(value, self.min, self.max);
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    /// Replace the lower bound. The current value is left untouched.
    pub fn set_min(&mut self, min: f64) {
        self.min = min;
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Replace the upper bound. The current value is left untouched.
    pub fn set_max(&mut self, max: f64) {
        self.max = max;
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn set_step(&mut self, step: f64) {
        self.step = step;
    }
}

// ============================================================================
// BoundedInteger
// ============================================================================

impl BoundedInteger {
    /// Create a bounded integer; `value` is clamped into `[min, max]`.
    pub fn new(value: i64, min: i64, max: i64) -> Self {
        let mut bounded = Self {
            value: min,
            min,
            max,
            step: 1,
        };
        bounded.set_value(value);
        bounded
    }

    /// Set the UI increment.
    pub fn with_step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Store `value` clamped into `[min, max]`.
    pub fn set_value(&mut self, value: i64) {
        self.value = clamp_i64(value, self.min, self.max);
    }

    /// Truncate toward zero, then clamp.
    pub fn set_value_f64(&mut self, value: f64) {
        self.set_value(truncate(value));
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    /// Replace the lower bound. The current value is left untouched.
    pub fn set_min(&mut self, min: i64) {
        self.min = min;
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Replace the upper bound. The current value is left untouched.
    pub fn set_max(&mut self, max: i64) {
        self.max = max;
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn set_step(&mut self, step: i64) {
        self.step = step;
    }
}

/// `as` saturates and maps NaN to 0.
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

// ============================================================================
// RadioSelect
// ============================================================================

impl RadioSelect {
    /// Build a choice from a non-empty list of unique labels.
    ///
    /// The selection starts at `default` when it is one of the labels,
    /// otherwise at the first label.
    pub fn new<I, S>(values: I, default: Option<&str>) -> ParameterResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut settings = IndexMap::new();
        for label in values {
            let label = label.into();
            if settings.insert(label.clone(), false).is_some() {
                return Err(ParameterError::InvalidChoices {
                    reason: format!("duplicate option '{}'", label),
                });
            }
        }

        let value = match default {
            Some(d) if settings.contains_key(d) => d.to_string(),
            _ => settings
                .keys()
                .next()
                .cloned()
                .ok_or_else(|| ParameterError::InvalidChoices {
                    reason: "a choice needs at least one option".to_string(),
                })?,
        };
        settings.insert(value.clone(), true);

        Ok(Self { settings, value })
    }

    /// Build a choice from typed options.
    ///
    /// `default` is always selectable: it is prepended when `options`
    /// does not contain it.
    pub fn from_choices<T: ChoiceSet>(options: &[T], default: T) -> Self {
        let mut settings: IndexMap<String, bool> = IndexMap::new();
        if !options.contains(&default) {
            settings.insert(default.label().to_string(), false);
        }
        for option in options {
            settings.insert(option.label().to_string(), false);
        }
        settings.insert(default.label().to_string(), true);

        Self {
            settings,
            value: default.label().to_string(),
        }
    }

    /// Currently selected label.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Select `label`. Labels outside the declared set are rejected and
    /// leave the selection unchanged.
    pub fn set_value(&mut self, label: &str) -> ParameterResult<()> {
        if !self.settings.contains_key(label) {
            return Err(ParameterError::invalid(
                CHOICE,
                format!(
                    "'{}' is not one of [{}]",
                    label,
                    self.options().collect::<Vec<_>>().join(", ")
                ),
            ));
        }
        if let Some(selected) = self.settings.get_mut(&self.value) {
            *selected = false;
        }
        if let Some(selected) = self.settings.get_mut(label) {
            *selected = true;
        }
        self.value = label.to_string();
        Ok(())
    }

    /// Label -> selected flags, in declaration order.
    pub fn settings(&self) -> &IndexMap<String, bool> {
        &self.settings
    }

    /// Declared labels, in order.
    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(|s| s.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.settings.contains_key(label)
    }

    /// The selection as a typed option.
    pub fn selected<T: ChoiceSet>(&self) -> Option<T> {
        T::from_label(&self.value)
    }
}

// ============================================================================
// Parameter
// ============================================================================

impl Parameter {
    /// Kind tag of this slot.
    pub fn kind(&self) -> ParamKind {
        match self {
            Parameter::Integer(_) => ParamKind::BoundedInteger,
            Parameter::Double(_) => ParamKind::BoundedDouble,
            Parameter::Choice(_) => ParamKind::RadioSelect,
            Parameter::Flag(_) => ParamKind::Boolean,
        }
    }

    /// Current value.
    pub fn value(&self) -> Value {
        match self {
            Parameter::Integer(p) => Value::Integer(p.value()),
            Parameter::Double(p) => Value::Float(p.value()),
            Parameter::Choice(p) => Value::String(p.value().to_string()),
            Parameter::Flag(b) => Value::Boolean(*b),
        }
    }

    /// Assign a typed value through the slot's setter.
    ///
    /// Numeric values are converted between integer and float and then
    /// clamped; a value of the wrong kind is rejected. Errors name the
    /// slot's kind; [`ParameterSet`] re-attributes them to the parameter.
    pub fn set(&mut self, value: &Value) -> ParameterResult<()> {
        match (self, value) {
            (Parameter::Integer(p), Value::Integer(v)) => p.set_value(*v),
            (Parameter::Integer(p), Value::Float(v)) => p.set_value_f64(*v),
            (Parameter::Double(p), v @ (Value::Integer(_) | Value::Float(_))) => {
                p.set_value(v.as_float().unwrap_or_default())
            }
            (Parameter::Choice(p), Value::String(label)) => p.set_value(label)?,
            (Parameter::Flag(b), Value::Boolean(v)) => *b = *v,
            (slot, other) => {
                let kind = slot.kind();
                return Err(ParameterError::invalid(
                    kind.display_name(),
                    format!("expected {}, got {}", kind, other.kind()),
                ));
            }
        }
        Ok(())
    }

    /// Parse `raw` according to this slot's kind and assign it.
    pub fn parse_and_set(&mut self, raw: &str) -> ParameterResult<()> {
        let raw = raw.trim();
        let kind = self.kind();
        let value = match kind {
            ParamKind::BoundedInteger | ParamKind::BoundedDouble => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| {
                    ParameterError::invalid(kind.display_name(), format!("'{}' is not a number", raw))
                })?,
            ParamKind::RadioSelect => Value::String(raw.to_string()),
            ParamKind::Boolean => Value::Boolean(
                parse_flag(raw).map_err(|reason| ParameterError::invalid(kind.display_name(), reason))?,
            ),
        };
        self.set(&value)
    }
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(format!("'{}' is not a boolean", raw)),
    }
}

// ============================================================================
// ParameterSet
// ============================================================================

impl ParameterSet {
    /// Create a set holding only the `active` flag.
    pub fn new() -> Self {
        let mut params = IndexMap::new();
        params.insert(ACTIVE.to_string(), Parameter::Flag(DEFAULT_ACTIVE));
        Self { params }
    }

    /// Declare an integer parameter.
    pub fn integer(mut self, name: &str, param: BoundedInteger) -> Self {
        self.params.insert(name.to_string(), Parameter::Integer(param));
        self
    }

    /// Declare a double parameter.
    pub fn double(mut self, name: &str, param: BoundedDouble) -> Self {
        self.params.insert(name.to_string(), Parameter::Double(param));
        self
    }

    /// Declare a choice parameter.
    pub fn choice(mut self, name: &str, param: RadioSelect) -> Self {
        self.params.insert(name.to_string(), Parameter::Choice(param));
        self
    }

    /// Declare a boolean parameter.
    pub fn flag(mut self, name: &str, value: bool) -> Self {
        self.params.insert(name.to_string(), Parameter::Flag(value));
        self
    }

    /// Look up a parameter slot.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.get(name)
    }

    /// Current value of `name`.
    pub fn value(&self, name: &str) -> ParameterResult<Value> {
        self.params
            .get(name)
            .map(Parameter::value)
            .ok_or_else(|| ParameterError::unknown(name))
    }

    /// Assign a typed value to `name`.
    pub fn set(&mut self, name: &str, value: &Value) -> ParameterResult<()> {
        let slot = self
            .params
            .get_mut(name)
            .ok_or_else(|| ParameterError::unknown(name))?;
        slot.set(value).map_err(|e| e.with_name(name))
    }

    /// Parse `raw` per the declared kind of `name` and assign it.
    pub fn set_raw(&mut self, name: &str, raw: &str) -> ParameterResult<()> {
        let slot = self
            .params
            .get_mut(name)
            .ok_or_else(|| ParameterError::unknown(name))?;
        slot.parse_and_set(raw).map_err(|e| e.with_name(name))
    }

    /// Read an integer parameter.
    pub fn get_integer(&self, name: &str) -> Option<i64> {
        match self.params.get(name)? {
            Parameter::Integer(p) => Some(p.value()),
            _ => None,
        }
    }

    /// Read a double parameter.
    pub fn get_double(&self, name: &str) -> Option<f64> {
        match self.params.get(name)? {
            Parameter::Double(p) => Some(p.value()),
            _ => None,
        }
    }

    /// Read a choice parameter as its typed option.
    pub fn get_choice<T: ChoiceSet>(&self, name: &str) -> Option<T> {
        match self.params.get(name)? {
            Parameter::Choice(p) => p.selected(),
            _ => None,
        }
    }

    /// Read a boolean parameter.
    pub fn get_flag(&self, name: &str) -> Option<bool> {
        match self.params.get(name)? {
            Parameter::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether the owning filter should transform its input.
    pub fn is_active(&self) -> bool {
        self.get_flag(ACTIVE).unwrap_or(DEFAULT_ACTIVE)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(|s| s.as_str())
    }

    /// `(name, slot)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Validated deserialization
// ============================================================================

#[derive(Deserialize)]
struct BoundedDoubleState {
    value: f64,
    min: f64,
    max: f64,
    step: f64,
}

impl TryFrom<BoundedDoubleState> for BoundedDouble {
    type Error = ParameterError;

    fn try_from(state: BoundedDoubleState) -> ParameterResult<Self> {
        if !state.min.is_finite() || !state.max.is_finite() {
            return Err(ParameterError::invalid(
                ParamKind::BoundedDouble.display_name(),
                format!("bounds [{}, {}] must be finite", state.min, state.max),
            ));
        }
        Ok(Self::new(state.value, state.min, state.max).with_step(state.step))
    }
}

#[derive(Deserialize)]
struct BoundedIntegerState {
    value: i64,
    min: i64,
    max: i64,
    step: i64,
}

impl From<BoundedIntegerState> for BoundedInteger {
    fn from(state: BoundedIntegerState) -> Self {
        Self::new(state.value, state.min, state.max).with_step(state.step)
    }
}

#[derive(Deserialize)]
struct RadioSelectState {
    settings: IndexMap<String, bool>,
    value: String,
}

impl TryFrom<RadioSelectState> for RadioSelect {
    type Error = ParameterError;

    fn try_from(state: RadioSelectState) -> ParameterResult<Self> {
        let selected: Vec<&String> = state
            .settings
            .iter()
            .filter(|(_, on)| **on)
            .map(|(label, _)| label)
            .collect();
        if selected != [&state.value] {
            return Err(ParameterError::InvalidChoices {
                reason: format!("exactly '{}' must be selected", state.value),
            });
        }
        Ok(Self {
            settings: state.settings,
            value: state.value,
        })
    }
}

#[derive(Deserialize)]
struct ParameterSetState {
    params: IndexMap<String, Parameter>,
}

impl TryFrom<ParameterSetState> for ParameterSet {
    type Error = ParameterError;

    fn try_from(state: ParameterSetState) -> ParameterResult<Self> {
        let active_first = matches!(
            state.params.first(),
            Some((name, Parameter::Flag(_))) if name == ACTIVE
        );
        if !active_first {
            return Err(ParameterError::invalid(
                ACTIVE,
                "the active flag must be declared first",
            ));
        }
        Ok(Self {
            params: state.params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Channel {
        Red,
        Green,
        Blue,
    }

    impl ChoiceSet for Channel {
        const ALL: &'static [Self] = &[Channel::Red, Channel::Green, Channel::Blue];

        fn label(self) -> &'static str {
            match self {
                Channel::Red => "Red",
                Channel::Green => "Green",
                Channel::Blue => "Blue",
            }
        }
    }

    #[test]
    fn test_bounded_double_clamps() {
        let mut gamma = BoundedDouble::new(1.0, 0.0, 10.0);
        gamma.set_value(12.5);
        assert_eq!(gamma.value(), 10.0);
        gamma.set_value(-3.0);
        assert_eq!(gamma.value(), 0.0);
        gamma.set_value(f64::NAN);
        assert_eq!(gamma.value(), 0.0);
    }

    #[test]
    fn test_bounded_integer_truncates_then_clamps() {
        let mut threshold = BoundedInteger::new(0, 0, 255);
        threshold.set_value_f64(99.9);
        assert_eq!(threshold.value(), 99);
        threshold.set_value_f64(-0.7);
        assert_eq!(threshold.value(), 0);
        threshold.set_value(1000);
        assert_eq!(threshold.value(), 255);
    }

    #[test]
    fn test_constructor_clamps_initial_value() {
        assert_eq!(BoundedInteger::new(300, 0, 255).value(), 255);
        assert_eq!(BoundedDouble::new(-1.0, 0.0, 5.0).value(), 0.0);
    }

    #[test]
    fn test_bound_change_does_not_reclamp() {
        // Lazy clamp: a bound change only takes effect on the next write.
        let mut p = BoundedInteger::new(200, 0, 255);
        p.set_max(100);
        assert_eq!(p.value(), 200);
        p.set_value(200);
        assert_eq!(p.value(), 100);

        let mut d = BoundedDouble::new(1.0, 0.0, 10.0);
        d.set_min(5.0);
        assert_eq!(d.value(), 1.0);
        d.set_value(d.value());
        assert_eq!(d.value(), 5.0);
    }

    #[test]
    fn test_inverted_bounds_do_not_panic() {
        let mut p = BoundedDouble::new(1.0, 0.0, 10.0);
        p.set_min(20.0);
        p.set_value(15.0);
        assert_eq!(p.value(), 10.0);
    }

    #[test]
    fn test_step_is_not_a_clamp() {
        let mut p = BoundedInteger::new(3, 1, 255).with_step(2);
        p.set_value(4);
        assert_eq!(p.value(), 4);
        p.set_step(5);
        assert_eq!(p.step(), 5);
    }

    #[test]
    fn test_radio_select_defaults() {
        let choice = RadioSelect::new(["Red", "Green", "Blue"], None).unwrap();
        assert_eq!(choice.value(), "Red");

        let choice = RadioSelect::new(["Red", "Green", "Blue"], Some("Blue")).unwrap();
        assert_eq!(choice.value(), "Blue");

        let choice = RadioSelect::new(["Red", "Green"], Some("Purple")).unwrap();
        assert_eq!(choice.value(), "Red");
    }

    #[test]
    fn test_radio_select_rejects_bad_construction() {
        assert!(matches!(
            RadioSelect::new(Vec::<String>::new(), None),
            Err(ParameterError::InvalidChoices { .. })
        ));
        assert!(matches!(
            RadioSelect::new(["a", "a"], None),
            Err(ParameterError::InvalidChoices { .. })
        ));
    }

    #[test]
    fn test_radio_select_rejects_unknown_label() {
        let mut choice = RadioSelect::new(["Red", "Green", "Blue"], None).unwrap();
        assert!(matches!(
            choice.set_value("Purple"),
            Err(ParameterError::InvalidParameter { .. })
        ));
        assert_eq!(choice.value(), "Red");
        assert_eq!(choice.settings().values().filter(|s| **s).count(), 1);
    }

    #[test]
    fn test_radio_select_typed() {
        let mut choice = RadioSelect::from_choices(&Channel::ALL[1..], Channel::Red);
        assert_eq!(choice.options().collect::<Vec<_>>(), ["Red", "Green", "Blue"]);
        choice.set_value("Blue").unwrap();
        assert_eq!(choice.selected::<Channel>(), Some(Channel::Blue));
    }

    #[test]
    fn test_parameter_set_always_has_active_first() {
        let set = ParameterSet::new().integer("threshold", BoundedInteger::new(0, 0, 255));
        assert_eq!(set.names().collect::<Vec<_>>(), [ACTIVE, "threshold"]);
        assert!(set.is_active());
    }

    #[test]
    fn test_parameter_set_raw_parsing() {
        let mut set = ParameterSet::new()
            .integer("threshold", BoundedInteger::new(0, 0, 255))
            .double("gamma", BoundedDouble::new(1.0, 0.0, 10.0))
            .choice("channel", RadioSelect::from_choices(Channel::ALL, Channel::Red))
            .flag("inverse", false);

        set.set_raw("threshold", "100.7").unwrap();
        assert_eq!(set.get_integer("threshold"), Some(100));
        set.set_raw("gamma", "2.2").unwrap();
        assert_eq!(set.get_double("gamma"), Some(2.2));
        set.set_raw("channel", "Green").unwrap();
        assert_eq!(set.get_choice::<Channel>("channel"), Some(Channel::Green));
        set.set_raw("inverse", "true").unwrap();
        assert_eq!(set.get_flag("inverse"), Some(true));
        set.set_raw(ACTIVE, "0").unwrap();
        assert!(!set.is_active());
    }

    #[test]
    fn test_parameter_set_errors() {
        let mut set = ParameterSet::new()
            .integer("threshold", BoundedInteger::new(0, 0, 255))
            .choice("channel", RadioSelect::from_choices(Channel::ALL, Channel::Red));

        assert_eq!(
            set.set_raw("sigma", "1"),
            Err(ParameterError::unknown("sigma"))
        );
        assert!(matches!(
            set.set_raw("threshold", "lots"),
            Err(ParameterError::InvalidParameter { .. })
        ));
        assert!(matches!(
            set.set_raw("channel", "Purple"),
            Err(ParameterError::InvalidParameter { .. })
        ));
        assert!(matches!(
            set.set("threshold", &Value::Boolean(true)),
            Err(ParameterError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_errors_name_the_parameter() {
        let mut set = ParameterSet::new()
            .choice("channel", RadioSelect::from_choices(Channel::ALL, Channel::Red));
        let err = set.set_raw("channel", "Purple").unwrap_err();
        assert_eq!(err.parameter_name(), Some("channel"));
        let err = set.set_raw(ACTIVE, "maybe").unwrap_err();
        assert_eq!(err.parameter_name(), Some(ACTIVE));

        let mut slot = Parameter::Integer(BoundedInteger::new(0, 0, 9));
        assert_eq!(
            slot.set(&Value::from("x")).unwrap_err().parameter_name(),
            Some("integer")
        );
    }

    #[test]
    fn test_deserialize_round_trip() {
        let set = ParameterSet::new()
            .integer("threshold", BoundedInteger::new(7, 0, 255))
            .double("gamma", BoundedDouble::new(2.5, 0.0, 10.0))
            .choice("channel", RadioSelect::from_choices(Channel::ALL, Channel::Blue));
        let json = serde_json::to_string(&set).unwrap();
        let back: ParameterSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_deserialize_clamps_bounded_values() {
        let p: BoundedInteger =
            serde_json::from_str(r#"{"value":900,"min":0,"max":255,"step":1}"#).unwrap();
        assert_eq!(p.value(), 255);
        let d: BoundedDouble =
            serde_json::from_str(r#"{"value":-4.0,"min":0.0,"max":1.0,"step":0.1}"#).unwrap();
        assert_eq!(d.value(), 0.0);
    }

    #[test]
    fn test_deserialize_rejects_broken_choices() {
        for json in [
            r#"{"settings":{"a":false,"b":false},"value":"a"}"#,
            r#"{"settings":{"a":true,"b":true},"value":"a"}"#,
            r#"{"settings":{"a":false,"b":true},"value":"a"}"#,
            r#"{"settings":{},"value":"a"}"#,
        ] {
            assert!(serde_json::from_str::<RadioSelect>(json).is_err(), "{}", json);
        }
        let ok: RadioSelect =
            serde_json::from_str(r#"{"settings":{"a":false,"b":true},"value":"b"}"#).unwrap();
        assert_eq!(ok.value(), "b");
    }

    #[test]
    fn test_deserialize_requires_active_first() {
        let json = r#"{"params":{"gamma":{"kind":"Flag","state":true}}}"#;
        assert!(serde_json::from_str::<ParameterSet>(json).is_err());
        let json = r#"{"params":{"active":{"kind":"Flag","state":false}}}"#;
        let set: ParameterSet = serde_json::from_str(json).unwrap();
        assert!(!set.is_active());
    }

    proptest! {
        #[test]
        fn prop_bounded_double_stays_in_range(
            min in -1000.0f64..1000.0,
            span in 0.0f64..1000.0,
            value in proptest::num::f64::ANY,
        ) {
            let mut p = BoundedDouble::new(min, min, min + span);
            p.set_value(value);
            prop_assert!(p.min() <= p.value() && p.value() <= p.max());
        }

        #[test]
        fn prop_bounded_integer_stays_in_range(
            min in -1000i64..1000,
            span in 0i64..1000,
            value in proptest::num::f64::ANY,
        ) {
            let mut p = BoundedInteger::new(min, min, min + span);
            p.set_value_f64(value);
            prop_assert!(p.min() <= p.value() && p.value() <= p.max());
        }

        #[test]
        fn prop_radio_select_single_selection(picks in proptest::collection::vec(0usize..4, 1..20)) {
            let labels = ["a", "b", "c"];
            let mut choice = RadioSelect::new(labels, None).unwrap();
            for pick in picks {
                let label = ["a", "b", "c", "zzz"][pick];
                let accepted = choice.set_value(label).is_ok();
                prop_assert_eq!(accepted, pick < 3);
                let selected: Vec<_> = choice.settings().iter().filter(|(_, s)| **s).collect();
                prop_assert_eq!(selected.len(), 1);
                prop_assert_eq!(selected[0].0.as_str(), choice.value());
            }
        }
    }
}
