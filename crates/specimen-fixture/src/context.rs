//! Per-call resolution context

use specimen_builders::{SpecimenBuilder, SpecimenContext};
use specimen_kernel::{FixtureError, Request, Specimen};
use std::cell::RefCell;

/// Threads every request of one top-level call through the assembled graph
///
/// Records the request path so an exhausted pipeline can report the deepest
/// request nothing could satisfy.
pub(crate) struct ResolutionContext<'g> {
    root: &'g dyn SpecimenBuilder,
    path: RefCell<Vec<Request>>,
    deepest: RefCell<Vec<Request>>,
}

struct Step<'c>(&'c RefCell<Vec<Request>>);

impl Drop for Step<'_> {
    fn drop(&mut self) {
        self.0.borrow_mut().pop();
    }
}

impl<'g> ResolutionContext<'g> {
    pub(crate) fn new(root: &'g dyn SpecimenBuilder) -> Self {
        Self {
            root,
            path: RefCell::new(Vec::new()),
            deepest: RefCell::new(Vec::new()),
        }
    }

    /// Error for a top-level request that produced no value
    pub(crate) fn creation_failed(&self, request: &Request, outcome: &Specimen) -> FixtureError {
        let deepest = self.deepest.borrow();
        let path = if deepest.is_empty() {
            vec![request.to_string()]
        } else {
            deepest.iter().map(ToString::to_string).collect()
        };
        tracing::debug!(%request, outcome = outcome.label(), depth = path.len(), "creation failed");
        FixtureError::ObjectCreationFailed {
            request: request.to_string(),
            path,
        }
    }
}

impl SpecimenContext for ResolutionContext<'_> {
    fn resolve(&self, request: &Request) -> Result<Specimen, FixtureError> {
        self.path.borrow_mut().push(request.clone());
        let _step = Step(&self.path);

        let outcome = self.root.create(request, self)?;
        if outcome.is_no_specimen() {
            let path = self.path.borrow();
            let mut deepest = self.deepest.borrow_mut();
            if path.len() > deepest.len() {
                deepest.clone_from(&path);
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specimen_builders::{
        CompositeBuilder, MethodInvoker, ParameterRequestRelay, SeedIgnoringRelay,
    };
    use specimen_kernel::{param, Dyn, Introspect, ObjectShape, Shape};
    use std::fmt::Debug;

    trait Store: Debug + Send + Sync {}

    #[derive(Debug, Clone)]
    struct Repository;

    impl Introspect for Repository {
        fn shape() -> Shape {
            ObjectShape::builder::<Self>()
                .constructor("new", vec![param::<Dyn<dyn Store>>("store")], |_| Ok(Repository))
                .build()
        }
    }

    #[test]
    fn failure_names_the_deepest_unsatisfied_request() {
        let root = CompositeBuilder::default()
            .with(ParameterRequestRelay)
            .with(SeedIgnoringRelay)
            .with(MethodInvoker::modest());
        let context = ResolutionContext::new(&root);
        let request = Request::of::<Repository>();

        let outcome = context.resolve(&request).unwrap();
        assert!(outcome.is_no_specimen());

        let err = context.creation_failed(&request, &outcome);
        assert!(err.is_creation_failure());
        let path = err.path();
        assert_eq!(path.first().map(String::as_str), Some("Repository"));
        assert_eq!(path.last().map(String::as_str), Some("Dyn<dyn Store>"));
        assert!(context.path.borrow().is_empty());
    }
}
