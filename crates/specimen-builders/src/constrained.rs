//! Generators for constrained values
//!
//! Parameters and members carrying a [`Constraint`] are turned into dedicated
//! requests by [`ConstraintRelay`] and answered by the generators here.

use crate::builder::{SpecimenBuilder, SpecimenContext};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use regex::Regex;
use specimen_kernel::{
    Constraint, FixtureError, NumberRange, PrimitiveKind, Request, Shape, Specimen, TypeRef,
};
use std::fmt::Debug;
use std::sync::Arc;

/// Turns constrained parameter and member requests into constrained requests
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintRelay;

impl ConstraintRelay {
    fn translate(ty: TypeRef, constraint: &Constraint) -> Option<Request> {
        let is_string = ty.is::<String>();
        match constraint {
            Constraint::Length { min, max } if is_string => Some(Request::ConstrainedString {
                min_len: *min,
                max_len: *max,
            }),
            Constraint::Pattern(pattern) if is_string => Some(Request::Pattern {
                pattern: pattern.clone(),
            }),
            Constraint::Range(range) => match ty.shape() {
                Shape::Primitive(kind) if kind.is_numeric() => Some(Request::RangedNumber {
                    ty,
                    range: *range,
                }),
                _ => None,
            },
            _ => None,
        }
    }
}

impl SpecimenBuilder for ConstraintRelay {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let (ty, constraint) = match request {
            Request::Parameter(p) => (p.ty, p.constraint.as_ref()),
            Request::Property(m) | Request::Field(m) => (m.ty, m.constraint.as_ref()),
            _ => return Ok(Specimen::NoSpecimen),
        };
        match constraint.and_then(|c| Self::translate(ty, c)) {
            Some(constrained) => context.resolve(&constrained),
            None => Ok(Specimen::NoSpecimen),
        }
    }
}

/// Strings of bounded length, assembled from unconstrained strings
///
/// Length is counted in characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstrainedStringGenerator;

impl SpecimenBuilder for ConstrainedStringGenerator {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let Request::ConstrainedString { min_len, max_len } = *request else {
            return Ok(Specimen::NoSpecimen);
        };
        if min_len > max_len {
            return Err(FixtureError::invalid_configuration(format!(
                "minimum length {min_len} exceeds maximum length {max_len}"
            )));
        }

        let mut text = String::new();
        loop {
            let Some(part) = context.resolve(&Request::of::<String>())?.into_value() else {
                return Ok(Specimen::NoSpecimen);
            };
            let part = part.downcast::<String>()?;
            text.push_str(&part);
            if text.chars().count() >= min_len {
                break;
            }
            if part.is_empty() {
                return Err(FixtureError::invalid_configuration(format!(
                    "strings resolve empty, minimum length {min_len} is unreachable"
                )));
            }
        }
        Ok(Specimen::of(text.chars().take(max_len).collect::<String>()))
    }
}

/// Deterministic walk through each requested range
///
/// Starts at the minimum (rounded up for integer types), steps by one and
/// wraps back to the start past the maximum. Each type and range pair keeps
/// its own position.
#[derive(Debug, Default)]
pub struct RangedNumberGenerator {
    positions: Mutex<IndexMap<(TypeRef, NumberRange), f64>>,
}

impl RangedNumberGenerator {
    /// Fresh positions
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self, ty: TypeRef, kind: PrimitiveKind, range: NumberRange) -> Result<f64, FixtureError> {
        let (lower, upper) = kind.numeric_bounds();
        let min = range.min().max(lower);
        let max = range.max().min(upper);
        let start = if kind.is_integer() { min.ceil() } else { min };
        let end = if kind.is_integer() { max.floor() } else { max };
        if start > end {
            return Err(FixtureError::invalid_configuration(format!(
                "range {range} holds no {ty} value"
            )));
        }

        let mut positions = self.positions.lock();
        let value = match positions.get(&(ty, range)) {
            Some(previous) if previous + 1.0 <= end => previous + 1.0,
            _ => start,
        };
        positions.insert((ty, range), value);
        Ok(value)
    }
}

impl SpecimenBuilder for RangedNumberGenerator {
    fn create(
        &self,
        request: &Request,
        _context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let Request::RangedNumber { ty, range } = request else {
            return Ok(Specimen::NoSpecimen);
        };
        let Shape::Primitive(kind) = ty.shape() else {
            return Ok(Specimen::NoSpecimen);
        };
        if !kind.is_numeric() {
            return Ok(Specimen::NoSpecimen);
        }

        let n = self.next(*ty, kind, *range)?;
        let value = kind.numeric_from_f64(n).ok_or_else(|| {
            FixtureError::invalid_configuration(format!("{ty} is not numeric"))
        })?;
        if !kind
            .numeric_as_f64(&value)
            .is_some_and(|stored| range.contains(stored))
        {
            return Err(FixtureError::invalid_configuration(format!(
                "range {range} is not representable as {ty}"
            )));
        }
        Ok(Specimen::Value(value))
    }
}

/// Opaque collaborator producing strings for a regular expression
pub trait PatternGenerator: Send + Sync + Debug {
    /// A string matching `pattern`, or `None` if the pattern is unsupported
    fn generate(&self, pattern: &str) -> Option<String>;
}

/// Answers pattern requests through a pluggable [`PatternGenerator`]
///
/// Output that does not fully match the pattern is rejected with
/// [`FixtureError::PatternMismatch`]. Without a generator, pattern requests
/// yield no specimen.
#[derive(Debug, Default)]
pub struct PatternStringGenerator {
    generator: RwLock<Option<Arc<dyn PatternGenerator>>>,
    compiled: Mutex<IndexMap<String, Regex>>,
}

impl PatternStringGenerator {
    /// Generator without a collaborator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace the collaborator
    pub fn set_generator(&self, generator: Arc<dyn PatternGenerator>) {
        *self.generator.write() = Some(generator);
    }

    fn matches(&self, pattern: &str, candidate: &str) -> Result<bool, FixtureError> {
        let mut compiled = self.compiled.lock();
        if let Some(regex) = compiled.get(pattern) {
            return Ok(regex.is_match(candidate));
        }
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
            FixtureError::invalid_configuration(format!("invalid pattern {pattern:?}: {e}"))
        })?;
        let matched = regex.is_match(candidate);
        compiled.insert(pattern.to_string(), regex);
        Ok(matched)
    }
}

impl SpecimenBuilder for PatternStringGenerator {
    fn create(
        &self,
        request: &Request,
        _context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        let Request::Pattern { pattern } = request else {
            return Ok(Specimen::NoSpecimen);
        };
        let Some(generator) = self.generator.read().clone() else {
            return Ok(Specimen::NoSpecimen);
        };
        let Some(generated) = generator.generate(pattern) else {
            return Ok(Specimen::NoSpecimen);
        };
        if !self.matches(pattern, &generated)? {
            return Err(FixtureError::PatternMismatch {
                pattern: pattern.clone(),
                generated,
            });
        }
        Ok(Specimen::of(generated))
    }
}
