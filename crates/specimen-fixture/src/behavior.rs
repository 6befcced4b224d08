//! Behaviors - decorators wrapped around the whole builder graph
//!
//! A [`Behavior`] receives the assembled graph and returns a wrapped one.
//! Behaviors are applied in registration order, so the last one registered is
//! the outermost layer.

use specimen_builders::{BuilderRef, RecursionGuard, RecursionPolicy, TracingBuilder};
use specimen_kernel::FixtureError;
use std::fmt::Debug;
use std::sync::Arc;

/// Graph-wide decorator
pub trait Behavior: Send + Sync + Debug {
    /// Behavior name, unique within a fixture
    fn name(&self) -> &'static str;

    /// Wrap `builder`
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidConfiguration`] when the behavior's own
    /// settings are unusable.
    fn transform(&self, builder: BuilderRef) -> Result<BuilderRef, FixtureError>;
}

/// Shared handle to a behavior
pub type BehaviorRef = Arc<dyn Behavior>;

/// Cycle detection around the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursionBehavior {
    policy: RecursionPolicy,
    depth: usize,
}

impl RecursionBehavior {
    /// Name under which the behavior is registered
    pub const NAME: &'static str = "recursion";

    /// Detect cycles deeper than `depth` and answer them with `policy`
    #[inline]
    #[must_use]
    pub fn new(policy: RecursionPolicy, depth: usize) -> Self {
        Self { policy, depth }
    }

    /// Policy applied to cycles
    #[inline]
    #[must_use]
    pub fn policy(&self) -> RecursionPolicy {
        self.policy
    }

    /// Allowed occurrences of a request on the path
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Behavior for RecursionBehavior {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn transform(&self, builder: BuilderRef) -> Result<BuilderRef, FixtureError> {
        Ok(Arc::new(RecursionGuard::new(builder, self.policy, self.depth)?))
    }
}

/// Debug-level `tracing` events for every request
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBehavior;

impl TracingBehavior {
    /// Name under which the behavior is registered
    pub const NAME: &'static str = "tracing";
}

impl Behavior for TracingBehavior {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn transform(&self, builder: BuilderRef) -> Result<BuilderRef, FixtureError> {
        Ok(Arc::new(TracingBuilder::new(builder)))
    }
}
