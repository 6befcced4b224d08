//! Relays - builders that answer a request by resolving a simpler one
//!
//! - Parameter and member requests become seeded requests named after the slot
//! - Seeded requests fall back to plain type requests
//! - Wrappers, sequences and maps resolve their inner types and reassemble
//! - `Multiple` expands to a finite sequence of the configured repeat count

use crate::builder::{SpecimenBuilder, SpecimenContext};
use specimen_kernel::{
    FixtureError, Request, Seed, Shape, Specimen, SpecimenSequence, TypeRef, Value,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of items produced for a `Multiple` request
pub const DEFAULT_REPEAT_COUNT: usize = 3;

/// Constructor parameters resolve as the parameter type seeded with its name
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterRequestRelay;

impl SpecimenBuilder for ParameterRequestRelay {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let Request::Parameter(parameter) = request else {
            return Ok(Specimen::NoSpecimen);
        };
        context.resolve(&Request::Seeded {
            ty: parameter.ty,
            seed: Seed::name(parameter.name),
        })
    }
}

/// Properties and fields resolve as the member type seeded with its name
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberRequestRelay;

impl SpecimenBuilder for MemberRequestRelay {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let Some(member) = request.member() else {
            return Ok(Specimen::NoSpecimen);
        };
        context.resolve(&Request::Seeded {
            ty: member.ty,
            seed: Seed::name(member.name),
        })
    }
}

/// Seeded requests nobody used the seed for resolve as plain type requests
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedIgnoringRelay;

impl SpecimenBuilder for SeedIgnoringRelay {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        match request {
            Request::Seeded { ty, .. } => context.resolve(&Request::Type(*ty)),
            _ => Ok(Specimen::NoSpecimen),
        }
    }
}

/// `Option<T>`: wraps a resolved `T`; a null specimen becomes `None`
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalRelay;

impl SpecimenBuilder for OptionalRelay {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let Request::Type(ty) = request else {
            return Ok(Specimen::NoSpecimen);
        };
        let Shape::Optional(wrapper) = ty.shape() else {
            return Ok(Specimen::NoSpecimen);
        };
        match context.resolve(&Request::Type(wrapper.inner))? {
            Specimen::Value(value) => (wrapper.wrap)(value).map(Specimen::Value),
            Specimen::Null => Ok(wrapper
                .empty
                .map_or(Specimen::Null, |empty| Specimen::Value(empty()))),
            other => Ok(other),
        }
    }
}

/// `Box<T>`, `Arc<T>`: wraps a resolved `T`; other outcomes pass through
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerRelay;

impl SpecimenBuilder for PointerRelay {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let Request::Type(ty) = request else {
            return Ok(Specimen::NoSpecimen);
        };
        let Shape::Pointer(wrapper) = ty.shape() else {
            return Ok(Specimen::NoSpecimen);
        };
        match context.resolve(&Request::Type(wrapper.inner))? {
            Specimen::Value(value) => (wrapper.wrap)(value).map(Specimen::Value),
            other => Ok(other),
        }
    }
}

/// Take the elements out of a resolved sequence specimen
fn into_elements(specimen: Specimen) -> Result<Option<Vec<Value>>, FixtureError> {
    match specimen {
        Specimen::Value(value) => Ok(Some(value.downcast::<SpecimenSequence>()?.0)),
        _ => Ok(None),
    }
}

/// Collections: arrays of fixed length get exactly that many elements,
/// everything else gets the repeat count
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRelay;

impl SpecimenBuilder for SequenceRelay {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let Request::Type(ty) = request else {
            return Ok(Specimen::NoSpecimen);
        };
        let Shape::Sequence(sequence) = ty.shape() else {
            return Ok(Specimen::NoSpecimen);
        };
        let element = Box::new(Request::Type(sequence.element));
        let inner = match sequence.len {
            Some(count) => Request::FiniteSequence {
                request: element,
                count,
            },
            None => Request::Multiple(element),
        };
        let Some(elements) = into_elements(context.resolve(&inner)?)? else {
            return Ok(Specimen::NoSpecimen);
        };
        if sequence.len.is_some_and(|len| len != elements.len()) {
            tracing::trace!(sequence = %ty, produced = elements.len(), "array length not met");
            return Ok(Specimen::NoSpecimen);
        }
        (sequence.collect)(elements).map(Specimen::Value)
    }
}

/// Maps: repeat-count keys paired with as many values
#[derive(Debug, Clone, Copy, Default)]
pub struct MapRelay;

impl MapRelay {
    fn many(ty: TypeRef, context: &dyn SpecimenContext) -> Result<Option<Vec<Value>>, FixtureError> {
        into_elements(context.resolve(&Request::Multiple(Box::new(Request::Type(ty))))?)
    }
}

impl SpecimenBuilder for MapRelay {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let Request::Type(ty) = request else {
            return Ok(Specimen::NoSpecimen);
        };
        let Shape::Map(map) = ty.shape() else {
            return Ok(Specimen::NoSpecimen);
        };
        let Some(keys) = Self::many(map.key, context)? else {
            return Ok(Specimen::NoSpecimen);
        };
        let Some(values) = Self::many(map.value, context)? else {
            return Ok(Specimen::NoSpecimen);
        };
        (map.collect)(keys.into_iter().zip(values).collect()).map(Specimen::Value)
    }
}

/// `Multiple` requests become finite sequences of the repeat count
#[derive(Debug)]
pub struct MultipleRelay {
    count: AtomicUsize,
}

impl MultipleRelay {
    /// Relay producing `count` items per `Multiple` request
    #[inline]
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            count: AtomicUsize::new(count),
        }
    }

    /// Current repeat count
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Change the repeat count
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidArgument`] for a zero count.
    pub fn set_count(&self, count: usize) -> Result<(), FixtureError> {
        if count == 0 {
            return Err(FixtureError::invalid_argument("repeat count must be positive"));
        }
        self.count.store(count, Ordering::SeqCst);
        Ok(())
    }
}

impl Default for MultipleRelay {
    fn default() -> Self {
        Self::new(DEFAULT_REPEAT_COUNT)
    }
}

impl SpecimenBuilder for MultipleRelay {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let Request::Multiple(inner) = request else {
            return Ok(Specimen::NoSpecimen);
        };
        context.resolve(&Request::FiniteSequence {
            request: inner.clone(),
            count: self.count(),
        })
    }
}

/// Finite sequences: `count` independent resolutions of the element request
///
/// Omitted and null elements are dropped; an element with no specimen fails
/// the whole sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiniteSequenceRelay;

impl SpecimenBuilder for FiniteSequenceRelay {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let Request::FiniteSequence { request: element, count } = request else {
            return Ok(Specimen::NoSpecimen);
        };
        let mut elements = Vec::new();
        elements.try_reserve(*count).map_err(|e| {
            FixtureError::invalid_argument(format!("sequence of {count} elements: {e}"))
        })?;
        for _ in 0..*count {
            match context.resolve(element)? {
                Specimen::Value(value) => elements.push(value),
                Specimen::Omit | Specimen::Null => {}
                Specimen::NoSpecimen => return Ok(Specimen::NoSpecimen),
            }
        }
        Ok(Specimen::of(SpecimenSequence(elements)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::testing::{resolve_value, RootContext};
    use crate::composite::CompositeBuilder;
    use crate::primitives::{NumericSequenceGenerator, StringGenerator};
    use pretty_assertions::assert_eq;
    use specimen_kernel::{MemberInfo, MemberKind};
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Answer(Specimen);

    impl SpecimenBuilder for Answer {
        fn create(&self, request: &Request, _: &dyn SpecimenContext) -> Result<Specimen, FixtureError> {
            Ok(match request {
                Request::Type(ty) if ty.is::<u8>() => self.0.clone(),
                _ => Specimen::NoSpecimen,
            })
        }
    }

    fn pipeline() -> CompositeBuilder {
        CompositeBuilder::default()
            .with(MemberRequestRelay)
            .with(StringGenerator)
            .with(NumericSequenceGenerator::new())
            .with(SeedIgnoringRelay)
            .with(OptionalRelay)
            .with(PointerRelay)
            .with(SequenceRelay)
            .with(MapRelay)
            .with(MultipleRelay::default())
            .with(FiniteSequenceRelay)
    }

    fn with_answer(answer: Specimen) -> CompositeBuilder {
        CompositeBuilder::default()
            .with(Answer(answer))
            .with(OptionalRelay)
            .with(PointerRelay)
            .with(SequenceRelay)
            .with(MultipleRelay::default())
            .with(FiniteSequenceRelay)
    }

    #[test]
    fn members_resolve_seeded_with_their_name() {
        let request = Request::Property(MemberInfo {
            owner: TypeRef::of::<u8>(),
            name: "title",
            kind: MemberKind::Property,
            ty: TypeRef::of::<String>(),
            constraint: None,
        });
        let value: String = resolve_value(&pipeline(), &request);
        assert!(value.starts_with("title"));
    }

    #[test]
    fn wrappers_resolve_inner_type() {
        let root = pipeline();
        let optional: Option<u32> = resolve_value(&root, &Request::of::<Option<u32>>());
        let boxed: Box<String> = resolve_value(&root, &Request::of::<Box<String>>());
        let shared: Arc<u64> = resolve_value(&root, &Request::of::<Arc<u64>>());
        assert_eq!(optional, Some(1));
        assert!(!boxed.is_empty());
        assert_eq!(*shared, 1);
    }

    #[test]
    fn null_becomes_none_and_passes_through_pointers() {
        let root = with_answer(Specimen::Null);
        let optional: Option<u8> = resolve_value(&root, &Request::of::<Option<u8>>());
        assert_eq!(optional, None);

        let context = RootContext::new(&root);
        let boxed = root.create(&Request::of::<Box<u8>>(), &context).unwrap();
        assert!(matches!(boxed, Specimen::Null));
    }

    #[test]
    fn sequences_use_repeat_count_and_array_length() {
        let root = pipeline();
        let list: Vec<u16> = resolve_value(&root, &Request::of::<Vec<u16>>());
        let array: [u16; 5] = resolve_value(&root, &Request::of::<[u16; 5]>());
        let set: HashSet<String> = resolve_value(&root, &Request::of::<HashSet<String>>());
        assert_eq!(list, vec![1, 2, 3]);
        assert_eq!(array, [4, 5, 6, 7, 8]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn maps_pair_keys_with_values() {
        let map: BTreeMap<u8, String> = resolve_value(&pipeline(), &Request::of::<BTreeMap<u8, String>>());
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn repeat_count_is_adjustable() {
        let relay = MultipleRelay::default();
        assert_eq!(relay.count(), DEFAULT_REPEAT_COUNT);
        relay.set_count(7).unwrap();
        assert_eq!(relay.count(), 7);
        assert!(relay.set_count(0).is_err());
    }

    #[test]
    fn omitted_elements_are_dropped() {
        let root = with_answer(Specimen::Omit);
        let list: Vec<u8> = resolve_value(&root, &Request::of::<Vec<u8>>());
        assert!(list.is_empty());

        let context = RootContext::new(&root);
        let array = root.create(&Request::of::<[u8; 2]>(), &context).unwrap();
        assert!(array.is_no_specimen());
    }

    #[test]
    fn oversized_sequence_is_rejected() {
        let root = pipeline();
        let context = RootContext::new(&root);
        let err = root.create(&Request::many::<u8>(usize::MAX), &context).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidArgument(_)));
    }

    #[test]
    fn missing_element_fails_the_sequence() {
        let root = with_answer(Specimen::NoSpecimen);
        let context = RootContext::new(&root);
        let outcome = root.create(&Request::many::<u8>(2), &context).unwrap();
        assert!(outcome.is_no_specimen());
    }

    #[test]
    fn finite_sequence_yields_specimen_sequence() {
        let root = pipeline();
        let context = RootContext::new(&root);
        let sequence = context
            .resolve(&Request::many::<i32>(4))
            .unwrap()
            .into_value()
            .unwrap()
            .downcast::<SpecimenSequence>()
            .unwrap();
        assert_eq!(sequence.downcast_all::<i32>().unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn relays_ignore_unrelated_requests() {
        let root = pipeline();
        let context = RootContext::new(&root);
        for relay in [&OptionalRelay as &dyn SpecimenBuilder, &PointerRelay, &SequenceRelay, &MapRelay] {
            assert!(relay.create(&Request::of::<u8>(), &context).unwrap().is_no_specimen());
        }
    }
}
