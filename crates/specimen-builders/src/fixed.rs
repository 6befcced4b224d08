//! Builders answering with caller-supplied values

use crate::builder::{SpecimenBuilder, SpecimenContext};
use specimen_kernel::{FixtureError, Introspect, Request, Specimen, TypeRef, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Always answers type requests for one type with a clone of the same value
///
/// Values holding `Arc`s share their payload between every answer.
#[derive(Debug, Clone)]
pub struct FixedBuilder {
    ty: TypeRef,
    value: Value,
}

impl FixedBuilder {
    /// Answer requests for `T` with `value`
    #[inline]
    #[must_use]
    pub fn new<T: Introspect>(value: T) -> Self {
        Self {
            ty: TypeRef::of::<T>(),
            value: Value::new(value),
        }
    }

    /// Answer requests for `ty` with an already erased value
    ///
    /// # Errors
    /// Returns [`FixtureError::TypeMismatch`] if `value` does not hold a `ty`.
    pub fn from_value(ty: TypeRef, value: Value) -> Result<Self, FixtureError> {
        if value.type_id() != ty.id() {
            return Err(FixtureError::TypeMismatch {
                expected: ty.name(),
                actual: value.type_name(),
            });
        }
        Ok(Self { ty, value })
    }

    /// Type this builder answers
    #[inline]
    #[must_use]
    pub fn target(&self) -> TypeRef {
        self.ty
    }
}

impl SpecimenBuilder for FixedBuilder {
    fn create(
        &self,
        request: &Request,
        _context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        match request {
            Request::Type(ty) if *ty == self.ty => Ok(Specimen::Value(self.value.clone())),
            _ => Ok(Specimen::NoSpecimen),
        }
    }
}

/// Cycles through a finite set of values for one type
#[derive(Debug)]
pub struct ElementsBuilder {
    ty: TypeRef,
    values: Vec<Value>,
    cursor: AtomicUsize,
}

impl ElementsBuilder {
    /// Answer requests for `T` with `values`, in order, wrapping around
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidArgument`] when `values` is empty.
    pub fn new<T: Introspect>(values: impl IntoIterator<Item = T>) -> Result<Self, FixtureError> {
        let values: Vec<Value> = values.into_iter().map(Value::new).collect();
        if values.is_empty() {
            return Err(FixtureError::invalid_argument(format!(
                "elements for {} must not be empty",
                TypeRef::of::<T>()
            )));
        }
        Ok(Self {
            ty: TypeRef::of::<T>(),
            values,
            cursor: AtomicUsize::new(0),
        })
    }
}

impl SpecimenBuilder for ElementsBuilder {
    fn create(
        &self,
        request: &Request,
        _context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        match request {
            Request::Type(ty) if *ty == self.ty => {
                let index = self.cursor.fetch_add(1, Ordering::SeqCst) % self.values.len();
                Ok(Specimen::Value(self.values[index].clone()))
            }
            _ => Ok(Specimen::NoSpecimen),
        }
    }
}
