//! Specimen builder capability and resolution context
//!
//! Provides the [`SpecimenBuilder`] trait every pipeline stage implements and
//! the [`SpecimenContext`] through which builders resolve nested requests.

use specimen_kernel::{FixtureError, Introspect, Request, Seed, Specimen};
use std::fmt::Debug;
use std::sync::Arc;

/// Resolution facade handed to builders
///
/// A builder handling request A may call [`SpecimenContext::resolve`] for
/// request B before answering A; every call runs the full pipeline again.
pub trait SpecimenContext {
    /// Offer `request` to the whole pipeline
    ///
    /// # Errors
    /// Propagates hard failures (recursion, constructor failures). An
    /// unsatisfied request is `Ok(Specimen::NoSpecimen)`, not an error.
    fn resolve(&self, request: &Request) -> Result<Specimen, FixtureError>;
}

impl dyn SpecimenContext + '_ {
    /// Resolve an instance of `T`
    ///
    /// # Errors
    /// Returns [`FixtureError::ObjectCreationFailed`] if nothing produced a
    /// value, or the hard failure raised while resolving.
    pub fn create<T: Introspect>(&self) -> Result<T, FixtureError> {
        self.create_from(Request::of::<T>())
    }

    /// Resolve an instance of `T` derived from `seed`
    ///
    /// # Errors
    /// See [`Self::create`].
    pub fn create_seeded<T: Introspect>(&self, seed: Seed) -> Result<T, FixtureError> {
        self.create_from(Request::seeded::<T>(seed))
    }

    fn create_from<T: Introspect>(&self, request: Request) -> Result<T, FixtureError> {
        match self.resolve(&request)? {
            Specimen::Value(value) => value.downcast::<T>(),
            _ => Err(FixtureError::ObjectCreationFailed {
                request: request.to_string(),
                path: vec![request.to_string()],
            }),
        }
    }
}

/// Strategy that may satisfy a request
///
/// Returning [`Specimen::NoSpecimen`] is normal control flow: the next
/// builder in the pipeline gets its turn.
pub trait SpecimenBuilder: Send + Sync + Debug {
    /// Attempt to produce a specimen for `request`
    ///
    /// # Errors
    /// Only for failures that must abort the whole resolution.
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError>;
}

impl<B: SpecimenBuilder + ?Sized> SpecimenBuilder for Arc<B> {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        (**self).create(request, context)
    }
}

impl<B: SpecimenBuilder + ?Sized> SpecimenBuilder for Box<B> {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        (**self).create(request, context)
    }
}

/// Shared handle to a builder
pub type BuilderRef = Arc<dyn SpecimenBuilder>;
