//! Specimen Kernel
//!
//! Leaf types of the anonymous test-object pipeline.
//!
//! # Core Concepts
//!
//! - [`Request`]: Structural description of a wanted specimen
//! - [`Specimen`]: Outcome of offering a request to a builder
//! - [`Value`]: Cloneable, type-erased generated value
//! - [`Introspect`]: Capability of a type to describe its [`Shape`]
//! - [`TypeRef`]: Lazily-described type identity
//! - [`Constraint`]: Eagerly validated value constraints
//!
//! # Example
//!
//! ```rust
//! use specimen_kernel::{Introspect, Request, Shape, TypeRef};
//!
//! let request = Request::of::<Vec<String>>();
//! assert_eq!(request.target_type(), Some(TypeRef::of::<Vec<String>>()));
//! assert!(matches!(Vec::<String>::shape(), Shape::Sequence(_)));
//! ```

#![warn(unreachable_pub)]

// Core modules
mod constraint;
mod error;
mod introspect;
mod request;
mod shape;
mod value;

// Re-exports
pub use constraint::{Constraint, NumberRange};
pub use error::FixtureError;
pub use introspect::{Dyn, Introspect};
pub use request::{MemberInfo, MemberKind, ParameterInfo, Request, Seed};
pub use shape::{
    param, short_type_name, Arguments, Constructor, EnumShape, MapShape, Member, ObjectShape,
    ObjectShapeBuilder, Param, PrimitiveKind, SequenceKind, SequenceShape, Shape, TypeRef,
    WrapperShape,
};
pub use value::{Specimen, SpecimenSequence, SpecimenValue, Value};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
