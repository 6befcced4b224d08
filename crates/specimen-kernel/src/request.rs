//! Requests - structural descriptions of wanted specimens
//!
//! Provides [`Request`] and the descriptors it carries. Equality is structural:
//! two requests for the same type, parameter or member compare equal, which is
//! what recursion detection and caching key on.

use crate::constraint::{Constraint, NumberRange};
use crate::introspect::Introspect;
use crate::shape::TypeRef;
use crate::value::Value;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Constructor parameter descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterInfo {
    /// Type declaring the constructor
    pub owner: TypeRef,
    /// Constructor name
    pub constructor: &'static str,
    /// Zero-based position
    pub position: usize,
    /// Parameter name
    pub name: &'static str,
    /// Parameter type
    pub ty: TypeRef,
    /// Optional value constraint
    pub constraint: Option<Constraint>,
}

/// Kind of writable member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Setter-backed property
    Property,
    /// Plain field
    Field,
}

/// Writable member descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberInfo {
    /// Type declaring the member
    pub owner: TypeRef,
    /// Member name
    pub name: &'static str,
    /// Property or field
    pub kind: MemberKind,
    /// Member type
    pub ty: TypeRef,
    /// Optional value constraint
    pub constraint: Option<Constraint>,
}

/// Seed attached to a [`Request::Seeded`]
///
/// Compared by type and debug rendering of the seed value.
#[derive(Clone)]
pub struct Seed {
    value: Value,
    key: String,
}

impl Seed {
    /// Seed from a typed value
    #[must_use]
    pub fn new<T: Introspect>(value: T) -> Self {
        let key = format!("{value:?}");
        Self {
            value: Value::new(value),
            key,
        }
    }

    /// Seed from a name (parameter or member names, user prefixes)
    #[inline]
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::new(name.into())
    }

    /// Seed value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Seed as text, when it is a string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.value.downcast_ref::<String>().map(String::as_str)
    }
}

impl From<&str> for Seed {
    fn from(name: &str) -> Self {
        Self::name(name)
    }
}

impl From<String> for Seed {
    fn from(name: String) -> Self {
        Self::name(name)
    }
}

impl PartialEq for Seed {
    fn eq(&self, other: &Self) -> bool {
        self.value.type_id() == other.value.type_id() && self.key == other.key
    }
}

impl Eq for Seed {}

impl Hash for Seed {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.type_id().hash(state);
        self.key.hash(state);
    }
}

impl Debug for Seed {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Structural description of a wanted specimen
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Request {
    /// An instance of a type
    Type(TypeRef),

    /// An instance of a type, derived from a seed
    Seeded {
        /// Wanted type
        ty: TypeRef,
        /// Seed
        seed: Seed,
    },

    /// An argument for a constructor parameter
    Parameter(ParameterInfo),

    /// A value for a writable property
    Property(MemberInfo),

    /// A value for a writable field
    Field(MemberInfo),

    /// Several independent specimens for the inner request
    Multiple(Box<Request>),

    /// Exactly `count` independent specimens for the inner request
    FiniteSequence {
        /// Element request
        request: Box<Request>,
        /// Number of elements
        count: usize,
    },

    /// A string with length within `[min_len, max_len]`
    ConstrainedString {
        /// Minimum length
        min_len: usize,
        /// Maximum length
        max_len: usize,
    },

    /// A number of type `ty` within a range
    RangedNumber {
        /// Numeric type
        ty: TypeRef,
        /// Inclusive range
        range: NumberRange,
    },

    /// A string matching a regular expression
    Pattern {
        /// Regular expression
        pattern: String,
    },
}

impl Request {
    /// Request for an instance of `T`
    #[inline]
    #[must_use]
    pub fn of<T: Introspect>() -> Self {
        Self::Type(TypeRef::of::<T>())
    }

    /// Request for an instance of `T` derived from `seed`
    #[inline]
    #[must_use]
    pub fn seeded<T: Introspect>(seed: Seed) -> Self {
        Self::Seeded {
            ty: TypeRef::of::<T>(),
            seed,
        }
    }

    /// Request for `count` instances of `T`
    #[inline]
    #[must_use]
    pub fn many<T: Introspect>(count: usize) -> Self {
        Self::FiniteSequence {
            request: Box::new(Self::of::<T>()),
            count,
        }
    }

    /// Type this request produces, when it names one
    #[must_use]
    pub fn target_type(&self) -> Option<TypeRef> {
        match self {
            Self::Type(ty) | Self::Seeded { ty, .. } | Self::RangedNumber { ty, .. } => Some(*ty),
            Self::Parameter(p) => Some(p.ty),
            Self::Property(m) | Self::Field(m) => Some(m.ty),
            Self::ConstrainedString { .. } | Self::Pattern { .. } => Some(TypeRef::of::<String>()),
            Self::Multiple(_) | Self::FiniteSequence { .. } => None,
        }
    }

    /// The member descriptor for property and field requests
    #[inline]
    #[must_use]
    pub fn member(&self) -> Option<&MemberInfo> {
        match self {
            Self::Property(m) | Self::Field(m) => Some(m),
            _ => None,
        }
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(ty) => write!(f, "{ty}"),
            Self::Seeded { ty, seed } => write!(f, "{ty} seeded with {seed:?}"),
            Self::Parameter(p) => write!(
                f,
                "parameter {}: {} of {}::{}",
                p.name, p.ty, p.owner, p.constructor
            ),
            Self::Property(m) => write!(f, "property {}.{}: {}", m.owner, m.name, m.ty),
            Self::Field(m) => write!(f, "field {}.{}: {}", m.owner, m.name, m.ty),
            Self::Multiple(inner) => write!(f, "many {inner}"),
            Self::FiniteSequence { request, count } => write!(f, "{count} x {request}"),
            Self::ConstrainedString { min_len, max_len } => {
                write!(f, "string of length {min_len}..={max_len}")
            }
            Self::RangedNumber { ty, range } => write!(f, "{ty} in {range}"),
            Self::Pattern { pattern } => write!(f, "string matching /{pattern}/"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn type_requests_are_structurally_equal() {
        assert_eq!(Request::of::<u32>(), Request::of::<u32>());
        assert_ne!(Request::of::<u32>(), Request::of::<i32>());

        let mut set = HashSet::new();
        set.insert(Request::of::<String>());
        assert!(set.contains(&Request::of::<String>()));
    }

    #[test]
    fn seeds_compare_by_type_and_value() {
        assert_eq!(Seed::name("id"), Seed::name("id"));
        assert_ne!(Seed::name("id"), Seed::name("name"));
        assert_ne!(Seed::new(1_u8), Seed::new(1_u16));
        assert_eq!(Seed::name("x").as_str(), Some("x"));
        assert_eq!(Seed::new(5_i32).as_str(), None);
    }

    #[test]
    fn target_type_follows_descriptors() {
        assert_eq!(
            Request::seeded::<u64>(Seed::name("n")).target_type(),
            Some(TypeRef::of::<u64>())
        );
        assert_eq!(
            Request::ConstrainedString { min_len: 1, max_len: 2 }.target_type(),
            Some(TypeRef::of::<String>())
        );
        assert_eq!(Request::many::<u8>(3).target_type(), None);
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(Request::of::<String>().to_string(), "String");
        assert_eq!(Request::many::<u8>(3).to_string(), "3 x u8");
        assert_eq!(
            Request::Multiple(Box::new(Request::of::<bool>())).to_string(),
            "many bool"
        );
    }
}
