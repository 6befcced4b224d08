//! Request tracing decorator

use crate::builder::{BuilderRef, SpecimenBuilder, SpecimenContext};
use specimen_kernel::{FixtureError, Request, Specimen};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Emits a `tracing` event for every request and its outcome
///
/// Events carry the nesting depth of the request on the current path.
#[derive(Debug)]
pub struct TracingBuilder {
    builder: BuilderRef,
    depth: AtomicUsize,
}

struct Level<'a>(&'a AtomicUsize);

impl Drop for Level<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl TracingBuilder {
    /// Trace requests handled by `builder`
    #[inline]
    #[must_use]
    pub fn new(builder: BuilderRef) -> Self {
        Self {
            builder,
            depth: AtomicUsize::new(0),
        }
    }

    /// Current nesting depth
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }
}

impl SpecimenBuilder for TracingBuilder {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let depth = self.depth.fetch_add(1, Ordering::SeqCst) + 1;
        let _level = Level(&self.depth);
        let span = tracing::debug_span!("resolve", depth);
        let _entered = span.enter();

        tracing::debug!(%request, "requested");
        let outcome = self.builder.create(request, context);
        match &outcome {
            Ok(specimen) => tracing::debug!(%request, outcome = specimen.label(), "resolved"),
            Err(error) => tracing::debug!(%request, %error, "failed"),
        }
        outcome
    }
}
