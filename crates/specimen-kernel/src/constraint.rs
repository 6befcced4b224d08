//! Value constraints attached to parameters and members
//!
//! Constraints are validated when they are declared, so contradictory bounds
//! surface at configuration time rather than halfway through a resolution.

use crate::error::FixtureError;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Inclusive numeric range
///
/// Compared and hashed by bit pattern so it can key structural requests.
#[derive(Debug, Clone, Copy)]
pub struct NumberRange {
    min: f64,
    max: f64,
}

impl NumberRange {
    /// Create a validated range
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidConfiguration`] if either bound is not
    /// finite or `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, FixtureError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(FixtureError::invalid_configuration(format!(
                "range bounds must be finite, got [{min}, {max}]"
            )));
        }
        if min > max {
            return Err(FixtureError::invalid_configuration(format!(
                "range minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Lower bound
    #[inline]
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound
    #[inline]
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Check whether `n` lies within the range
    #[inline]
    #[must_use]
    pub fn contains(&self, n: f64) -> bool {
        n >= self.min && n <= self.max
    }
}

impl PartialEq for NumberRange {
    fn eq(&self, other: &Self) -> bool {
        self.min.to_bits() == other.min.to_bits() && self.max.to_bits() == other.max.to_bits()
    }
}

impl Eq for NumberRange {}

impl Hash for NumberRange {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.min.to_bits().hash(state);
        self.max.to_bits().hash(state);
    }
}

impl Display for NumberRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Constraint on generated values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// String length within `[min, max]`
    Length {
        /// Minimum length
        min: usize,
        /// Maximum length
        max: usize,
    },

    /// Number within an inclusive range
    Range(NumberRange),

    /// String matching a regular expression
    Pattern(String),
}

impl Constraint {
    /// String length within `[min, max]`
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidConfiguration`] if `min > max`.
    pub fn length(min: usize, max: usize) -> Result<Self, FixtureError> {
        if min > max {
            return Err(FixtureError::invalid_configuration(format!(
                "minimum length {min} exceeds maximum length {max}"
            )));
        }
        Ok(Self::Length { min, max })
    }

    /// String length at most `max`
    #[inline]
    #[must_use]
    pub fn max_length(max: usize) -> Self {
        Self::Length { min: 0, max }
    }

    /// Number within `[min, max]`
    ///
    /// # Errors
    /// See [`NumberRange::new`].
    pub fn range(min: f64, max: f64) -> Result<Self, FixtureError> {
        NumberRange::new(min, max).map(Self::Range)
    }

    /// String matching `pattern`
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidConfiguration`] if the pattern does not
    /// compile.
    pub fn pattern(pattern: impl Into<String>) -> Result<Self, FixtureError> {
        let pattern = pattern.into();
        regex::Regex::new(&pattern).map_err(|e| {
            FixtureError::invalid_configuration(format!("invalid pattern {pattern:?}: {e}"))
        })?;
        Ok(Self::Pattern(pattern))
    }
}
