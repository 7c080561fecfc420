//! Ordered filter pipeline.
//!
//! A [`Pipeline`] holds filter units in application order. Every mutating
//! operation re-evaluates the whole list from the unmodified source image
//! (when one is loaded) and publishes the result to subscribed observers.
//! There is no caching of intermediate stages.

mod shared;
mod unit;

pub use shared::SharedPipeline;
pub use unit::FilterUnit;

use crate::core::error::{PipelineError, PipelineResult};
use crate::core::types::{Raster, Value};
use crate::filters::catalog::FilterKind;
use std::borrow::Cow;
use std::fmt;
use std::time::Instant;

/// Default upper bound on the number of units.
pub const DEFAULT_MAX_UNITS: usize = 64;

/// Callback receiving every freshly evaluated output.
pub type Observer = Box<dyn Fn(&Raster) + Send + Sync>;

/// An ordered list of filter units plus the image they are applied to.
pub struct Pipeline {
    units: Vec<FilterUnit>,
    source: Option<Raster>,
    output: Option<Raster>,
    observers: Vec<Observer>,
    max_units: usize,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("units", &self.units)
            .field("source", &self.source.as_ref().map(|s| s.dimensions()))
            .field("observers", &self.observers.len())
            .field("max_units", &self.max_units)
            .finish()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::with_max_units(DEFAULT_MAX_UNITS)
    }

    /// Create an empty pipeline holding at most `max_units` units.
    pub fn with_max_units(max_units: usize) -> Self {
        Self {
            units: Vec::new(),
            source: None,
            output: None,
            observers: Vec::new(),
            max_units,
        }
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Append a new unit of `kind` with default parameters.
    ///
    /// Returns the new unit's index.
    pub fn insert(&mut self, kind: FilterKind) -> PipelineResult<usize> {
        self.insert_at(kind, self.units.len())
    }

    /// Insert a new unit of `kind` at `index` (`index <= len`).
    pub fn insert_at(&mut self, kind: FilterKind, index: usize) -> PipelineResult<usize> {
        if index > self.units.len() {
            return Err(PipelineError::IndexOutOfRange {
                index,
                len: self.units.len(),
            });
        }
        if self.units.len() >= self.max_units {
            return Err(PipelineError::CapacityExceeded {
                max: self.max_units,
            });
        }
        self.units.insert(index, FilterUnit::new(kind));
        log::debug!("inserted {} at {}", kind, index);
        self.refresh();
        Ok(index)
    }

    /// Append a unit looked up by filter id or display name.
    pub fn insert_named(&mut self, key: &str) -> PipelineResult<usize> {
        let kind = FilterKind::lookup(key).ok_or_else(|| PipelineError::UnknownFilter {
            id: key.to_string(),
        })?;
        self.insert(kind)
    }

    /// Remove and return the unit at `index`; later units shift down.
    pub fn remove(&mut self, index: usize) -> PipelineResult<FilterUnit> {
        self.check_index(index)?;
        let unit = self.units.remove(index);
        log::debug!("removed {} from {}", unit.name(), index);
        self.refresh();
        Ok(unit)
    }

    /// Swap the unit at `index` with its predecessor.
    ///
    /// Returns `false` without re-evaluating when already first.
    pub fn move_up(&mut self, index: usize) -> PipelineResult<bool> {
        self.check_index(index)?;
        if index == 0 {
            return Ok(false);
        }
        self.units.swap(index - 1, index);
        log::debug!("moved unit {} up", index);
        self.refresh();
        Ok(true)
    }

    /// Swap the unit at `index` with its successor.
    ///
    /// Returns `false` without re-evaluating when already last.
    pub fn move_down(&mut self, index: usize) -> PipelineResult<bool> {
        self.check_index(index)?;
        if index + 1 == self.units.len() {
            return Ok(false);
        }
        self.units.swap(index, index + 1);
        log::debug!("moved unit {} down", index);
        self.refresh();
        Ok(true)
    }

    /// Parse `raw` per the declared kind of `name` on unit `index` and
    /// assign it.
    pub fn set_parameter(&mut self, index: usize, name: &str, raw: &str) -> PipelineResult<()> {
        self.unit_mut(index)?.set_parameter(name, raw)?;
        log::debug!("unit {}: {} = {}", index, name, raw);
        self.refresh();
        Ok(())
    }

    /// Assign a typed value to `name` on unit `index`.
    pub fn set_value(&mut self, index: usize, name: &str, value: &Value) -> PipelineResult<()> {
        self.unit_mut(index)?.set_value(name, value)?;
        log::debug!("unit {}: {} = {}", index, name, value);
        self.refresh();
        Ok(())
    }

    /// Current value of `name` on unit `index`.
    pub fn get_parameter(&self, index: usize, name: &str) -> PipelineResult<Value> {
        Ok(self.unit(index)?.get_parameter(name)?)
    }

    /// Remove every unit.
    pub fn clear(&mut self) {
        self.units.clear();
        log::debug!("cleared pipeline");
        self.refresh();
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub fn unit(&self, index: usize) -> PipelineResult<&FilterUnit> {
        self.check_index(index)?;
        Ok(&self.units[index])
    }

    fn unit_mut(&mut self, index: usize) -> PipelineResult<&mut FilterUnit> {
        self.check_index(index)?;
        Ok(&mut self.units[index])
    }

    /// Units in application order.
    pub fn units(&self) -> &[FilterUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn max_units(&self) -> usize {
        self.max_units
    }

    fn check_index(&self, index: usize) -> PipelineResult<()> {
        if index < self.units.len() {
            Ok(())
        } else {
            Err(PipelineError::IndexOutOfRange {
                index,
                len: self.units.len(),
            })
        }
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Apply every unit to `source`, left to right.
    ///
    /// Pure in `source` and the units' parameters; inactive units pass their
    /// input through without copying.
    pub fn evaluate(&self, source: &Raster) -> Raster {
        let start = Instant::now();
        let mut current = Cow::Borrowed(source);
        for (index, unit) in self.units.iter().enumerate() {
            if !unit.is_active() {
                log::trace!("stage {} ({}) inactive", index, unit.name());
                continue;
            }
            let stage = Instant::now();
            let next = unit.apply(&current);
            current = Cow::Owned(next);
            log::trace!("stage {} ({}) took {:?}", index, unit.name(), stage.elapsed());
        }
        log::trace!("evaluated {} units in {:?}", self.units.len(), start.elapsed());
        current.into_owned()
    }

    /// Set the base image every re-evaluation starts from.
    pub fn load_source(&mut self, source: Raster) {
        let (w, h) = source.dimensions();
        log::debug!("loaded {}x{} source", w, h);
        self.source = Some(source);
        self.refresh();
    }

    pub fn source(&self) -> Option<&Raster> {
        self.source.as_ref()
    }

    /// Output of the latest evaluation, if a source is loaded.
    pub fn output(&self) -> Option<&Raster> {
        self.output.as_ref()
    }

    /// Evaluate the loaded source.
    pub fn render(&self) -> PipelineResult<Raster> {
        let source = self.source.as_ref().ok_or(PipelineError::NoSource)?;
        Ok(self.evaluate(source))
    }

    /// Register a callback invoked with each new output.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&Raster) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Re-evaluate from the source and notify observers.
    fn refresh(&mut self) {
        let Some(source) = self.source.as_ref() else {
            return;
        };
        let output = self.evaluate(source);
        for observer in &self.observers {
            observer(&output);
        }
        self.output = Some(output);
    }
}
