//! Try-in-order composition of builders

use crate::builder::{BuilderRef, SpecimenBuilder, SpecimenContext};
use specimen_kernel::{FixtureError, Request, Specimen};
use std::sync::Arc;

/// Ordered sequence of builders; the first satisfied answer wins
///
/// Order is exactly as configured, index 0 first.
#[derive(Debug, Default, Clone)]
pub struct CompositeBuilder {
    builders: Vec<BuilderRef>,
}

impl CompositeBuilder {
    /// Create from builders in priority order
    #[inline]
    #[must_use]
    pub fn new(builders: Vec<BuilderRef>) -> Self {
        Self { builders }
    }

    /// Append a builder with the lowest priority
    #[inline]
    pub fn push(&mut self, builder: impl SpecimenBuilder + 'static) {
        self.builders.push(Arc::new(builder));
    }

    /// Append a builder with the lowest priority, builder style
    #[inline]
    #[must_use]
    pub fn with(mut self, builder: impl SpecimenBuilder + 'static) -> Self {
        self.push(builder);
        self
    }

    /// Builders in priority order
    #[inline]
    #[must_use]
    pub fn builders(&self) -> &[BuilderRef] {
        &self.builders
    }

    /// Number of builders
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    /// Check if there are no builders
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

impl SpecimenBuilder for CompositeBuilder {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        for builder in &self.builders {
            let specimen = builder.create(request, context)?;
            if specimen.is_satisfied() {
                return Ok(specimen);
            }
        }
        Ok(Specimen::NoSpecimen)
    }
}
