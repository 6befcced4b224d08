//! Recursion guard
//!
//! Tracks the requests in flight on the current resolution path and applies a
//! [`RecursionPolicy`] when a request shows up again before its first
//! occurrence has finished.

use crate::builder::{BuilderRef, SpecimenBuilder, SpecimenContext};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use specimen_kernel::{FixtureError, Request, Specimen};

/// What to do with a request that closes a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecursionPolicy {
    /// Fail with [`FixtureError::RecursionDetected`]
    #[default]
    Throw,

    /// Answer [`Specimen::Omit`]; the enclosing member or element is skipped
    Omit,

    /// Answer [`Specimen::Null`]; optional slots become `None`
    Null,
}

/// Default number of times a request may already be on the path
pub const DEFAULT_RECURSION_DEPTH: usize = 1;

/// Decorator detecting cyclic requests
///
/// A request is cyclic once it is already on the path `depth` times. State is
/// a stack behind a mutex, locked only to push, pop and inspect, never while
/// the inner builder runs.
#[derive(Debug)]
pub struct RecursionGuard {
    builder: BuilderRef,
    policy: RecursionPolicy,
    depth: usize,
    path: Mutex<Vec<Request>>,
}

/// Pops the top of the path when dropped, on every exit path
struct Frame<'a> {
    path: &'a Mutex<Vec<Request>>,
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        self.path.lock().pop();
    }
}

impl RecursionGuard {
    /// Guard `builder`
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidConfiguration`] for a zero depth.
    pub fn new(
        builder: BuilderRef,
        policy: RecursionPolicy,
        depth: usize,
    ) -> Result<Self, FixtureError> {
        if depth == 0 {
            return Err(FixtureError::invalid_configuration(
                "recursion depth must be at least 1",
            ));
        }
        Ok(Self {
            builder,
            policy,
            depth,
            path: Mutex::new(Vec::new()),
        })
    }

    /// Active policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> RecursionPolicy {
        self.policy
    }

    /// Requests currently in flight, outermost first
    #[must_use]
    pub fn path(&self) -> Vec<Request> {
        self.path.lock().clone()
    }

    fn on_cycle(&self, request: &Request, path: &[Request]) -> Result<Specimen, FixtureError> {
        tracing::debug!(request = %request, policy = ?self.policy, depth = path.len(), "recursion detected");
        match self.policy {
            RecursionPolicy::Throw => Err(FixtureError::RecursionDetected {
                request: request.to_string(),
                path: path
                    .iter()
                    .chain(std::iter::once(request))
                    .map(ToString::to_string)
                    .collect(),
            }),
            RecursionPolicy::Omit => Ok(Specimen::Omit),
            RecursionPolicy::Null => Ok(Specimen::Null),
        }
    }
}

impl SpecimenBuilder for RecursionGuard {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let frame = {
            let mut path = self.path.lock();
            if path.iter().filter(|r| *r == request).count() >= self.depth {
                let snapshot = path.clone();
                drop(path);
                return self.on_cycle(request, &snapshot);
            }
            path.push(request.clone());
            Frame { path: &self.path }
        };
        let outcome = self.builder.create(request, context);
        drop(frame);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::testing::RootContext;
    use crate::composite::CompositeBuilder;
    use crate::invoker::MethodInvoker;
    use crate::postprocess::{AutoPropertiesCommand, Postprocessor};
    use crate::primitives::{NumericSequenceGenerator, StringGenerator};
    use crate::relays::{
        MemberRequestRelay, OptionalRelay, ParameterRequestRelay, PointerRelay, SeedIgnoringRelay,
    };
    use specimen_kernel::{param, Introspect, ObjectShape, Shape};
    use std::sync::Arc;

    #[derive(Debug, Clone, Default)]
    struct Folder {
        name: String,
        parent: Option<Box<Folder>>,
    }

    impl Introspect for Folder {
        fn shape() -> Shape {
            ObjectShape::builder::<Self>()
                .constructor("new", vec![param::<String>("name")], |args| {
                    Ok(Folder { name: args.take()?, parent: None })
                })
                .property("parent", |f: &mut Folder, v: Option<Box<Folder>>| f.parent = v)
                .build()
        }
    }

    #[derive(Debug, Clone)]
    struct Chain(Box<Chain>);

    impl Introspect for Chain {
        fn shape() -> Shape {
            ObjectShape::builder::<Self>()
                .constructor("new", vec![param::<Box<Chain>>("next")], |args| Ok(Chain(args.take()?)))
                .build()
        }
    }

    #[derive(Debug)]
    struct Failing;

    impl SpecimenBuilder for Failing {
        fn create(&self, _: &Request, _: &dyn SpecimenContext) -> Result<Specimen, FixtureError> {
            Err(FixtureError::invalid_argument("boom"))
        }
    }

    fn guarded(policy: RecursionPolicy, depth: usize) -> RecursionGuard {
        let engine = CompositeBuilder::default()
            .with(ParameterRequestRelay)
            .with(MemberRequestRelay)
            .with(StringGenerator)
            .with(NumericSequenceGenerator::new())
            .with(SeedIgnoringRelay)
            .with(OptionalRelay)
            .with(PointerRelay)
            .with(Postprocessor::new(MethodInvoker::modest(), AutoPropertiesCommand::new()));
        RecursionGuard::new(Arc::new(engine), policy, depth).unwrap()
    }

    fn create_folder(guard: &RecursionGuard) -> Result<Specimen, FixtureError> {
        let context = RootContext::new(guard);
        guard.create(&Request::of::<Folder>(), &context)
    }

    #[test]
    fn throw_policy_reports_the_cycle() {
        let guard = guarded(RecursionPolicy::Throw, 1);
        let err = create_folder(&guard).unwrap_err();
        assert!(err.is_recursion());
        assert_eq!(err.path().first().map(String::as_str), Some("Folder"));
        assert_eq!(err.path().last().map(String::as_str), Some("Folder"));
    }

    #[test]
    fn omit_policy_leaves_the_member_unset() {
        let guard = guarded(RecursionPolicy::Omit, 1);
        let folder = create_folder(&guard)
            .unwrap()
            .into_value()
            .unwrap()
            .downcast::<Folder>()
            .unwrap();
        assert!(folder.name.starts_with("name"));
        assert!(folder.parent.is_none());
    }

    #[test]
    fn null_policy_materializes_none() {
        let guard = guarded(RecursionPolicy::Null, 1);
        let folder = create_folder(&guard)
            .unwrap()
            .into_value()
            .unwrap()
            .downcast::<Folder>()
            .unwrap();
        assert!(folder.parent.is_none());
    }

    #[test]
    fn deeper_limit_allows_nested_levels() {
        let guard = guarded(RecursionPolicy::Omit, 2);
        let folder = create_folder(&guard)
            .unwrap()
            .into_value()
            .unwrap()
            .downcast::<Folder>()
            .unwrap();
        let parent = folder.parent.expect("one nested level");
        assert!(parent.parent.is_none());
    }

    #[test]
    fn required_cycle_under_omit_yields_no_value() {
        let guard = guarded(RecursionPolicy::Omit, 1);
        let context = RootContext::new(&guard);
        let outcome = guard.create(&Request::of::<Chain>(), &context).unwrap();
        assert!(outcome.is_no_specimen());
    }

    #[test]
    fn path_is_unwound_after_success_and_failure() {
        let guard = guarded(RecursionPolicy::Throw, 1);
        assert!(create_folder(&guard).is_err());
        assert!(guard.path().is_empty());

        let failing = RecursionGuard::new(Arc::new(Failing), RecursionPolicy::Throw, 1).unwrap();
        let context = RootContext::new(&failing);
        assert!(failing.create(&Request::of::<u8>(), &context).is_err());
        assert!(failing.path().is_empty());
    }

    #[test]
    fn zero_depth_is_rejected() {
        let err = RecursionGuard::new(Arc::new(Failing), RecursionPolicy::Omit, 0).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidConfiguration(_)));
    }

    #[test]
    fn policy_serializes_in_snake_case() {
        assert_eq!(RecursionPolicy::default(), RecursionPolicy::Throw);
        let policy: RecursionPolicy = serde_json::from_str("\"omit\"").unwrap();
        assert_eq!(policy, RecursionPolicy::Omit);
    }
}
