//! Type-erased specimen values
//!
//! Provides [`Value`], a cloneable boxed value that remembers its type name, and
//! [`Specimen`], the outcome of offering a request to a builder.

use crate::error::FixtureError;
use std::any::{Any, TypeId};
use std::fmt;

/// Object-safe view of a generated value
///
/// Blanket-implemented for every `Any + Clone + Debug + Send + Sync` type.
pub trait SpecimenValue: Any + Send + Sync {
    /// Clone into a fresh box
    fn clone_boxed(&self) -> Box<dyn SpecimenValue>;

    /// Borrow as [`Any`]
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as [`Any`]
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Convert into a boxed [`Any`]
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Name of the concrete type
    fn type_name(&self) -> &'static str;

    /// Debug rendering of the concrete value
    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T> SpecimenValue for T
where
    T: Any + Clone + fmt::Debug + Send + Sync,
{
    fn clone_boxed(&self) -> Box<dyn SpecimenValue> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A generated value with its concrete type erased
pub struct Value(Box<dyn SpecimenValue>);

impl Value {
    /// Wrap a concrete value
    #[inline]
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Clone + fmt::Debug + Send + Sync,
    {
        Self(Box::new(value))
    }

    /// Name of the held type
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// [`TypeId`] of the held type
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        Any::type_id(self.0.as_any())
    }

    /// Check whether the held value is a `T`
    #[inline]
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    /// Borrow the held value as `T`
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the held value as `T`
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.0.as_any_mut().downcast_mut::<T>()
    }

    /// Mutably borrow the held value as [`Any`]
    #[inline]
    pub fn as_any_mut(&mut self) -> &mut dyn Any {
        self.0.as_any_mut()
    }

    /// Take the held value as `T`
    ///
    /// # Errors
    /// Returns [`FixtureError::TypeMismatch`] if the value holds another type.
    pub fn downcast<T: Any>(self) -> Result<T, FixtureError> {
        let actual = self.type_name();
        self.0
            .into_any()
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| FixtureError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                actual,
            })
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        Self(self.0.clone_boxed())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.debug(f)
    }
}

/// Outcome of offering a request to a builder
///
/// Absence is never encoded as a value: a builder that cannot handle a request
/// answers [`Specimen::NoSpecimen`] and the next builder gets its turn.
#[derive(Debug, Clone)]
pub enum Specimen {
    /// A produced value
    Value(Value),

    /// The builder cannot satisfy the request
    NoSpecimen,

    /// The slot should be skipped (member left unset, element dropped)
    Omit,

    /// A null specimen; materialized as `None` by optional shapes
    Null,
}

impl Specimen {
    /// Wrap a concrete value
    #[inline]
    #[must_use]
    pub fn of<T>(value: T) -> Self
    where
        T: Any + Clone + fmt::Debug + Send + Sync,
    {
        Self::Value(Value::new(value))
    }

    /// True unless this is [`Specimen::NoSpecimen`]
    #[inline]
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        !matches!(self, Self::NoSpecimen)
    }

    /// True for [`Specimen::NoSpecimen`]
    #[inline]
    #[must_use]
    pub fn is_no_specimen(&self) -> bool {
        matches!(self, Self::NoSpecimen)
    }

    /// Borrow the produced value
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Take the produced value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Short label for logs
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Value(value) => value.type_name(),
            Self::NoSpecimen => "no specimen",
            Self::Omit => "omit",
            Self::Null => "null",
        }
    }
}

impl From<Value> for Specimen {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Result of a sequence or repeat request: the produced elements in order
#[derive(Debug, Clone, Default)]
pub struct SpecimenSequence(pub Vec<Value>);

impl SpecimenSequence {
    /// Number of elements
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no element was produced
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Downcast every element to `T`
    ///
    /// # Errors
    /// Returns [`FixtureError::TypeMismatch`] for the first foreign element.
    pub fn downcast_all<T: Any>(self) -> Result<Vec<T>, FixtureError> {
        self.0.into_iter().map(Value::downcast::<T>).collect()
    }
}
