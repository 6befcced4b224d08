//! Constructor selection and invocation
//!
//! - [`ConstructorQuery`]: orders the candidate constructors of a record type
//! - [`MethodInvoker`]: resolves each parameter through the context and invokes
//!   the first candidate whose parameters all resolve

use crate::builder::{SpecimenBuilder, SpecimenContext};
use specimen_kernel::{
    Constructor, FixtureError, ObjectShape, Request, SequenceKind, Shape, Specimen, TypeRef, Value,
};
use std::cmp::Reverse;
use std::fmt::Debug;
use std::sync::Arc;

/// Policy ordering the constructors of a type
///
/// Constructors taking the owning type itself are never candidates.
pub trait ConstructorQuery: Send + Sync + Debug {
    /// Candidates in preference order
    fn select(&self, shape: &ObjectShape) -> Vec<Constructor>;
}

fn candidates(shape: &ObjectShape) -> Vec<Constructor> {
    let owner = shape.owner();
    shape
        .constructors()
        .iter()
        .filter(|c| c.parameters().iter().all(|p| p.ty != owner))
        .cloned()
        .collect()
}

fn count_sequences(ctor: &Constructor, kind: SequenceKind) -> usize {
    ctor.parameters()
        .iter()
        .filter(|p| matches!(p.ty.shape(), Shape::Sequence(s) if s.kind == kind))
        .count()
}

/// Fewest parameters first; ties keep declaration order
#[derive(Debug, Clone, Copy, Default)]
pub struct ModestConstructorQuery;

impl ConstructorQuery for ModestConstructorQuery {
    fn select(&self, shape: &ObjectShape) -> Vec<Constructor> {
        let mut ctors = candidates(shape);
        ctors.sort_by_key(Constructor::arity);
        ctors
    }
}

/// Most parameters first; ties keep declaration order
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyConstructorQuery;

impl ConstructorQuery for GreedyConstructorQuery {
    fn select(&self, shape: &ObjectShape) -> Vec<Constructor> {
        let mut ctors = candidates(shape);
        ctors.sort_by_key(|c| Reverse(c.arity()));
        ctors
    }
}

/// Constructors with the most array parameters first, then the most parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayFavoringConstructorQuery;

impl ConstructorQuery for ArrayFavoringConstructorQuery {
    fn select(&self, shape: &ObjectShape) -> Vec<Constructor> {
        let mut ctors = candidates(shape);
        ctors.sort_by_key(|c| (Reverse(count_sequences(c, SequenceKind::Array)), Reverse(c.arity())));
        ctors
    }
}

/// Constructors with the most list parameters first, then the most parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFavoringConstructorQuery;

impl ConstructorQuery for ListFavoringConstructorQuery {
    fn select(&self, shape: &ObjectShape) -> Vec<Constructor> {
        let mut ctors = candidates(shape);
        ctors.sort_by_key(|c| (Reverse(count_sequences(c, SequenceKind::List)), Reverse(c.arity())));
        ctors
    }
}

/// Builds record types through their constructors
#[derive(Debug, Clone)]
pub struct MethodInvoker {
    query: Arc<dyn ConstructorQuery>,
}

impl MethodInvoker {
    /// Invoker using `query` to order constructors
    #[inline]
    #[must_use]
    pub fn new(query: impl ConstructorQuery + 'static) -> Self {
        Self {
            query: Arc::new(query),
        }
    }

    /// Invoker preferring the fewest parameters
    #[inline]
    #[must_use]
    pub fn modest() -> Self {
        Self::new(ModestConstructorQuery)
    }

    /// Invoker preferring the most parameters
    #[inline]
    #[must_use]
    pub fn greedy() -> Self {
        Self::new(GreedyConstructorQuery)
    }

    /// Resolve every parameter of `ctor`, or `None` at the first that yields nothing
    fn resolve_arguments(
        ctor: &Constructor,
        context: &dyn SpecimenContext,
    ) -> Result<Option<Vec<Value>>, FixtureError> {
        let mut arguments = Vec::with_capacity(ctor.arity());
        for parameter in ctor.parameters() {
            match context.resolve(&Request::Parameter(parameter.clone()))? {
                Specimen::Value(value) => arguments.push(value),
                outcome => {
                    tracing::trace!(
                        constructor = ctor.name(),
                        parameter = parameter.name,
                        outcome = outcome.label(),
                        "parameter unresolved, trying next constructor"
                    );
                    return Ok(None);
                }
            }
        }
        Ok(Some(arguments))
    }

    fn construct(
        &self,
        ty: TypeRef,
        object: &ObjectShape,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        for ctor in self.query.select(object) {
            let Some(arguments) = Self::resolve_arguments(&ctor, context)? else {
                continue;
            };
            let value = ctor
                .invoke(arguments)
                .map_err(|e| FixtureError::ConstructorFailed {
                    ty: ty.name(),
                    constructor: ctor.name(),
                    reason: e.to_string(),
                })?;
            return Ok(Specimen::Value(value));
        }
        Ok(Specimen::NoSpecimen)
    }
}

impl Default for MethodInvoker {
    fn default() -> Self {
        Self::modest()
    }
}

impl SpecimenBuilder for MethodInvoker {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let Request::Type(ty) = request else {
            return Ok(Specimen::NoSpecimen);
        };
        match ty.shape() {
            Shape::Object(object) => self.construct(*ty, &object, context),
            _ => Ok(Specimen::NoSpecimen),
        }
    }
}
