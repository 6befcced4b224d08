//! Specimen Builders
//!
//! Composable strategies that satisfy specimen requests.
//!
//! # Core Concepts
//!
//! - [`SpecimenBuilder`]: Strategy that may satisfy a request
//! - [`SpecimenContext`]: Facade for resolving nested requests
//! - [`CompositeBuilder`]: Try-in-order composition, first answer wins
//! - [`FilteringBuilder`]: Builder scoped by a [`RequestSpecification`]
//! - [`Postprocessor`]: Runs [`SpecimenCommand`]s on freshly built values
//! - [`MethodInvoker`]: Constructor invocation driven by a [`ConstructorQuery`]
//! - [`RecursionGuard`]: Cycle detection with a [`RecursionPolicy`]
//!
//! # Example
//!
//! ```rust
//! use specimen_builders::{
//!     CompositeBuilder, NumericSequenceGenerator, SpecimenBuilder, SpecimenContext,
//!     StringGenerator,
//! };
//! use specimen_kernel::{FixtureError, Request, Specimen};
//!
//! struct Root(CompositeBuilder);
//!
//! impl SpecimenContext for Root {
//!     fn resolve(&self, request: &Request) -> Result<Specimen, FixtureError> {
//!         self.0.create(request, self)
//!     }
//! }
//!
//! let root = Root(
//!     CompositeBuilder::default()
//!         .with(StringGenerator)
//!         .with(NumericSequenceGenerator::new()),
//! );
//! let context: &dyn SpecimenContext = &root;
//! assert_eq!(context.create::<u32>().unwrap(), 1);
//! assert_eq!(context.create::<u32>().unwrap(), 2);
//! ```

#![warn(unreachable_pub)]

// Capabilities
mod builder;

// Combinators
mod composite;
mod filter;
mod postprocess;
mod recursion;
mod trace;

// Strategies
mod constrained;
mod fixed;
mod invoker;
mod primitives;
mod relays;

// Re-exports
pub use builder::{BuilderRef, SpecimenBuilder, SpecimenContext};
pub use composite::CompositeBuilder;
pub use constrained::{
    ConstrainedStringGenerator, ConstraintRelay, PatternGenerator, PatternStringGenerator,
    RangedNumberGenerator,
};
pub use filter::{
    AndSpecification, AnyObjectSpecification, CollectionSpecification, ExactTypeSpecification,
    FilteringBuilder, FnSpecification, ImplementsSpecification, InverseSpecification,
    MemberSpecification, OrSpecification, ParameterSpecification, RequestSpecification,
    SeededSpecification, TrueSpecification,
};
pub use fixed::{ElementsBuilder, FixedBuilder};
pub use invoker::{
    ArrayFavoringConstructorQuery, ConstructorQuery, GreedyConstructorQuery,
    ListFavoringConstructorQuery, MethodInvoker, ModestConstructorQuery,
};
pub use postprocess::{
    ActionCommand, AutoPropertiesCommand, BindingCommand, BindingSource, Postprocessor,
    SpecimenCommand,
};
pub use primitives::{
    BooleanSwitch, CharSequenceGenerator, DateTimeGenerator, EnumGenerator,
    NumericSequenceGenerator, RandomNumericSequenceGenerator, StringGenerator, UuidGenerator,
};
pub use recursion::{RecursionGuard, RecursionPolicy, DEFAULT_RECURSION_DEPTH};
pub use relays::{
    FiniteSequenceRelay, MapRelay, MemberRequestRelay, MultipleRelay, OptionalRelay,
    ParameterRequestRelay, PointerRelay, SeedIgnoringRelay, SequenceRelay, DEFAULT_REPEAT_COUNT,
};
pub use trace::TracingBuilder;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
