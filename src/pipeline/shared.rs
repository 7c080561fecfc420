//! Thread-safe pipeline handle.

use crate::pipeline::Pipeline;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// A pipeline behind an exclusive lock.
///
/// Each mutate-then-evaluate sequence runs while the lock is held, so
/// worker threads never observe a half-applied edit.
#[derive(Debug, Clone, Default)]
pub struct SharedPipeline {
    inner: Arc<Mutex<Pipeline>>,
}

impl SharedPipeline {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pipeline)),
        }
    }

    /// Lock the pipeline for the lifetime of the guard.
    pub fn lock(&self) -> MutexGuard<'_, Pipeline> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut Pipeline) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }
}

impl From<Pipeline> for SharedPipeline {
    fn from(pipeline: Pipeline) -> Self {
        Self::new(pipeline)
    }
}
