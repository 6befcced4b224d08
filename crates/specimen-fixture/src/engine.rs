//! Default engine - the built-in builder pipeline
//!
//! Assembled once per fixture. Stateful generators (counters, cursors) live
//! inside the pipeline, so every fixture owns its own sequence of values.
//!
//! # Order
//!
//! 1. Constraint relays and constrained generators
//! 2. Parameter and member relays (turn names into string seeds)
//! 3. Primitive generators (seeded strings and numbers answer before seeds are dropped)
//! 4. Seed-ignoring relay
//! 5. Wrapper, sequence and map relays
//! 6. Repeat-count and finite-sequence relays
//! 7. Custom collections, then records via constructor invocation plus
//!    auto-properties

use crate::config::{FixtureConfig, NumericGeneration};
use specimen_builders::{
    AnyObjectSpecification, AutoPropertiesCommand, BooleanSwitch, BuilderRef,
    CharSequenceGenerator, CollectionSpecification, CompositeBuilder, ConstrainedStringGenerator,
    ConstraintRelay, DateTimeGenerator, EnumGenerator, FilteringBuilder, FiniteSequenceRelay,
    ListFavoringConstructorQuery, MapRelay, MemberRequestRelay, MethodInvoker, MultipleRelay,
    NumericSequenceGenerator, OptionalRelay, ParameterRequestRelay, PatternStringGenerator,
    PointerRelay, Postprocessor, RandomNumericSequenceGenerator, RangedNumberGenerator,
    SeedIgnoringRelay, SequenceRelay, StringGenerator, UuidGenerator,
};
use std::sync::Arc;

/// Built-in pipeline plus handles to its tunable stages
#[derive(Debug)]
pub(crate) struct Engine {
    root: BuilderRef,
    multiple: Arc<MultipleRelay>,
    patterns: Arc<PatternStringGenerator>,
}

impl Engine {
    pub(crate) fn new(config: &FixtureConfig) -> Self {
        let multiple = Arc::new(MultipleRelay::new(config.repeat_count));
        let patterns = Arc::new(PatternStringGenerator::new());

        let mut pipeline = CompositeBuilder::default()
            .with(ConstraintRelay)
            .with(Arc::clone(&patterns))
            .with(ConstrainedStringGenerator)
            .with(RangedNumberGenerator::new())
            .with(ParameterRequestRelay)
            .with(MemberRequestRelay)
            .with(StringGenerator);

        match config.numeric_generation {
            NumericGeneration::Sequential => pipeline.push(NumericSequenceGenerator::new()),
            NumericGeneration::RandomUnique => pipeline.push(RandomNumericSequenceGenerator::new()),
        }

        let mut pipeline = pipeline
            .with(BooleanSwitch::default())
            .with(CharSequenceGenerator::default())
            .with(UuidGenerator)
            .with(DateTimeGenerator::new())
            .with(EnumGenerator::new())
            .with(SeedIgnoringRelay)
            .with(OptionalRelay)
            .with(PointerRelay)
            .with(SequenceRelay)
            .with(MapRelay)
            .with(Arc::clone(&multiple))
            .with(FiniteSequenceRelay)
            .with(FilteringBuilder::new(
                MethodInvoker::new(ListFavoringConstructorQuery),
                CollectionSpecification,
            ));

        if config.omit_auto_properties {
            pipeline.push(FilteringBuilder::new(
                MethodInvoker::modest(),
                AnyObjectSpecification,
            ));
        } else {
            pipeline.push(FilteringBuilder::new(
                Postprocessor::new(
                    MethodInvoker::modest(),
                    AutoPropertiesCommand::new().strict(config.strict_members),
                ),
                AnyObjectSpecification,
            ));
        }

        tracing::debug!(
            stages = pipeline.len(),
            numeric = ?config.numeric_generation,
            "engine assembled"
        );
        Self {
            root: Arc::new(pipeline),
            multiple,
            patterns,
        }
    }

    /// Pipeline root
    pub(crate) fn root(&self) -> BuilderRef {
        Arc::clone(&self.root)
    }

    /// Repeat-count relay shared with the pipeline
    pub(crate) fn multiple(&self) -> &MultipleRelay {
        &self.multiple
    }

    /// Pattern generator stage shared with the pipeline
    pub(crate) fn patterns(&self) -> &PatternStringGenerator {
        &self.patterns
    }
}
