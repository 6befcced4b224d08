//! Specimen Fixture
//!
//! Anonymous test-object generation for types that describe their own shape.
//!
//! # Core Concepts
//!
//! - [`Fixture`]: Facade owning the customization registry and default engine
//! - [`Composer`]: Per-type construction and population rules
//! - [`Behavior`]: Decorator wrapped around the whole builder graph
//! - [`FixtureConfig`]: Repeat count, recursion handling and generation modes
//!
//! # Example
//!
//! ```rust
//! use specimen_fixture::prelude::*;
//!
//! #[derive(Debug, Clone)]
//! struct Customer {
//!     name: String,
//!     visits: u32,
//! }
//!
//! impl Introspect for Customer {
//!     fn shape() -> Shape {
//!         ObjectShape::builder::<Self>()
//!             .constructor("new", vec![param::<String>("name")], |args| {
//!                 Ok(Customer { name: args.take()?, visits: 0 })
//!             })
//!             .property("visits", |c: &mut Customer, v: u32| c.visits = v)
//!             .build()
//!     }
//! }
//!
//! let fixture = Fixture::new();
//! let customer: Customer = fixture.create().unwrap();
//! assert!(customer.name.starts_with("name"));
//! assert_eq!(customer.visits, 1);
//!
//! let regular = fixture.build::<Customer>().with("visits", 40_u32).create().unwrap();
//! assert_eq!(regular.visits, 40);
//! ```

#![warn(unreachable_pub)]

// Facade
mod composer;
mod config;
mod fixture;

// Pipeline assembly
mod behavior;
mod context;
mod engine;

// Re-exports
pub use behavior::{Behavior, BehaviorRef, RecursionBehavior, TracingBehavior};
pub use composer::Composer;
pub use config::{FixtureConfig, NumericGeneration};
pub use fixture::Fixture;

pub use specimen_builders::{
    BuilderRef, PatternGenerator, RecursionPolicy, SpecimenBuilder, SpecimenContext,
};
pub use specimen_kernel::{FixtureError, Introspect, Request, Seed, Shape, Specimen, TypeRef};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Behavior, Composer, Fixture, FixtureConfig, FixtureError, NumericGeneration,
        RecursionPolicy,
    };
    pub use specimen_builders::SpecimenContext;
    pub use specimen_kernel::{
        param, Constraint, Dyn, EnumShape, Introspect, ObjectShape, Seed, Shape,
    };
}
