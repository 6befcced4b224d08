//! Fixture - the user-facing facade
//!
//! Owns the customization registry, the default engine, residue collectors and
//! behaviors. Every top-level call assembles
//!
//! ```text
//! behaviors( Composite[ one-off?, customizations.., engine, residue collectors.. ] )
//! ```
//!
//! and resolves one request through it. Registry mutation takes `&mut self`;
//! creation only needs `&self`.

use crate::behavior::{BehaviorRef, RecursionBehavior};
use crate::composer::{node, Composer, Construction};
use crate::config::FixtureConfig;
use crate::context::ResolutionContext;
use crate::engine::Engine;
use specimen_builders::{
    BuilderRef, CompositeBuilder, FilteringBuilder, FixedBuilder, PatternGenerator,
    RecursionPolicy, SeedIgnoringRelay, SeededSpecification, SpecimenContext,
};
use specimen_kernel::{
    FixtureError, Introspect, Request, Seed, Specimen, SpecimenSequence, TypeRef, Value,
};
use std::sync::Arc;

/// Anonymous test-object generator
#[derive(Debug)]
pub struct Fixture {
    config: FixtureConfig,
    engine: Engine,
    customizations: Vec<BuilderRef>,
    residue_collectors: Vec<BuilderRef>,
    behaviors: Vec<BehaviorRef>,
}

impl Fixture {
    /// Fixture with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::assemble(FixtureConfig::default())
    }

    /// Fixture with `config`
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidConfiguration`] when `config` fails
    /// validation.
    pub fn with_config(config: FixtureConfig) -> Result<Self, FixtureError> {
        config.validate()?;
        Ok(Self::assemble(config))
    }

    fn assemble(config: FixtureConfig) -> Self {
        let engine = Engine::new(&config);
        let recursion: BehaviorRef = Arc::new(RecursionBehavior::new(
            config.recursion_policy,
            config.recursion_depth,
        ));
        Self {
            config,
            engine,
            customizations: Vec::new(),
            residue_collectors: Vec::new(),
            behaviors: vec![recursion],
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    // Creation

    /// Create an anonymous `T`
    ///
    /// # Errors
    /// [`FixtureError::ObjectCreationFailed`] when nothing can produce a `T`,
    /// [`FixtureError::RecursionDetected`] for cycles under the throwing
    /// policy, or a failure raised by a constructor or customization.
    pub fn create<T: Introspect>(&self) -> Result<T, FixtureError> {
        self.create_through(Request::of::<T>(), None)
    }

    /// Create an anonymous `T` derived from `seed`
    ///
    /// String seeds prefix generated strings. Numeric seeds offset generated
    /// numbers. Other types ignore the seed.
    ///
    /// # Errors
    /// See [`Self::create`].
    pub fn create_seeded<T: Introspect>(&self, seed: impl Into<Seed>) -> Result<T, FixtureError> {
        self.create_through(Request::seeded::<T>(seed.into()), None)
    }

    /// Create as many `T` as the repeat count
    ///
    /// # Errors
    /// See [`Self::create`]; one failed element fails the whole call.
    pub fn create_many<T: Introspect>(&self) -> Result<Vec<T>, FixtureError> {
        self.create_many_n(self.repeat_count())
    }

    /// Create exactly `count` `T`
    ///
    /// # Errors
    /// See [`Self::create_many`].
    pub fn create_many_n<T: Introspect>(&self, count: usize) -> Result<Vec<T>, FixtureError> {
        self.create_sequence_through(Request::of::<T>(), count, None)
    }

    /// Create as many seeded `T` as the repeat count
    ///
    /// # Errors
    /// See [`Self::create_many`].
    pub fn create_many_seeded<T: Introspect>(
        &self,
        seed: impl Into<Seed>,
    ) -> Result<Vec<T>, FixtureError> {
        self.create_sequence_through(Request::seeded::<T>(seed.into()), self.repeat_count(), None)
    }

    /// Append as many `T` as the repeat count to `target`
    ///
    /// # Errors
    /// See [`Self::create_many`]; `target` is untouched on failure.
    pub fn add_many_to<T, C>(&self, target: &mut C) -> Result<(), FixtureError>
    where
        T: Introspect,
        C: Extend<T>,
    {
        let items = self.create_many::<T>()?;
        target.extend(items);
        Ok(())
    }

    /// Endless stream of anonymous `T`
    pub fn generate<T: Introspect>(&self) -> impl Iterator<Item = Result<T, FixtureError>> + '_ {
        std::iter::repeat_with(move || self.create::<T>())
    }

    /// Offer a raw request to the assembled graph
    ///
    /// Unsatisfied requests come back as [`Specimen::NoSpecimen`] rather than
    /// an error.
    ///
    /// # Errors
    /// Hard failures raised during resolution.
    pub fn resolve(&self, request: &Request) -> Result<Specimen, FixtureError> {
        let graph = self.graph(None)?;
        let context = ResolutionContext::new(&*graph);
        context.resolve(request)
    }

    pub(crate) fn create_through<T: Introspect>(
        &self,
        request: Request,
        extra: Option<BuilderRef>,
    ) -> Result<T, FixtureError> {
        tracing::debug!(%request, "create");
        self.resolve_top(&request, extra)?.downcast::<T>()
    }

    pub(crate) fn create_sequence_through<T: Introspect>(
        &self,
        element: Request,
        count: usize,
        extra: Option<BuilderRef>,
    ) -> Result<Vec<T>, FixtureError> {
        let request = Request::FiniteSequence {
            request: Box::new(element),
            count,
        };
        tracing::debug!(%request, "create many");
        self.resolve_top(&request, extra)?
            .downcast::<SpecimenSequence>()?
            .downcast_all::<T>()
    }

    fn resolve_top(
        &self,
        request: &Request,
        extra: Option<BuilderRef>,
    ) -> Result<Value, FixtureError> {
        let graph = self.graph(extra)?;
        let context = ResolutionContext::new(&*graph);
        match context.resolve(request)? {
            Specimen::Value(value) => Ok(value),
            other => Err(context.creation_failed(request, &other)),
        }
    }

    fn graph(&self, extra: Option<BuilderRef>) -> Result<BuilderRef, FixtureError> {
        let mut builders = Vec::with_capacity(
            self.customizations.len() + self.residue_collectors.len() + 2,
        );
        builders.extend(extra);
        builders.extend(self.customizations.iter().cloned());
        builders.push(self.engine.root());
        builders.extend(self.residue_collectors.iter().cloned());

        let mut graph: BuilderRef = Arc::new(CompositeBuilder::new(builders));
        for behavior in &self.behaviors {
            graph = behavior.transform(graph)?;
        }
        Ok(graph)
    }

    // Customization

    /// One-off composer for `T`; nothing is registered
    #[must_use]
    pub fn build<T: Introspect>(&self) -> Composer<'_, T> {
        Composer::new(self)
    }

    /// Register rules for every later `T`
    ///
    /// The newest customization wins over older ones.
    ///
    /// # Errors
    /// Member errors recorded by `recipe`; nothing is registered then.
    pub fn customize<T, F>(&mut self, recipe: F) -> Result<(), FixtureError>
    where
        T: Introspect,
        F: FnOnce(Composer<'_, T>) -> Composer<'_, T>,
    {
        let node = recipe(Composer::new(self)).into_node()?;
        self.push_customization(TypeRef::of::<T>(), node, "customize");
        Ok(())
    }

    /// Produce every later `T` with `factory`, members untouched
    pub fn register<T, F>(&mut self, factory: F)
    where
        T: Introspect,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let ty = TypeRef::of::<T>();
        self.push_customization(ty, node(ty, Construction::factory(factory), Vec::new()), "register");
    }

    /// Produce every later `T` with a factory that resolves its own inputs
    pub fn register_with<T, F>(&mut self, factory: F)
    where
        T: Introspect,
        F: Fn(&dyn SpecimenContext) -> Result<T, FixtureError> + Send + Sync + 'static,
    {
        let ty = TypeRef::of::<T>();
        self.push_customization(
            ty,
            node(ty, Construction::factory_with(factory), Vec::new()),
            "register",
        );
    }

    /// Answer every later `T` request with clones of `value`
    pub fn inject<T: Introspect>(&mut self, value: T) {
        let ty = TypeRef::of::<T>();
        let seam = CompositeBuilder::default()
            .with(FixedBuilder::new(value))
            .with(FilteringBuilder::new(SeedIgnoringRelay, SeededSpecification(ty)));
        self.push_customization(ty, Arc::new(seam), "inject");
    }

    /// Create a `T` and answer every later `T` request with clones of it
    ///
    /// # Notes
    /// Consumers receive clones, so reference identity holds only for
    /// payloads behind `Arc`; shared mutation needs interior mutability.
    ///
    /// # Errors
    /// See [`Self::create`]; nothing is registered on failure.
    pub fn freeze<T: Introspect>(&mut self) -> Result<T, FixtureError> {
        let value = self.create::<T>()?;
        self.inject(value.clone());
        Ok(value)
    }

    /// Create a `T` from `seed` and answer every later `T` request with it
    ///
    /// # Errors
    /// See [`Self::freeze`].
    pub fn freeze_seeded<T: Introspect>(&mut self, seed: impl Into<Seed>) -> Result<T, FixtureError> {
        let value = self.create_seeded::<T>(seed)?;
        self.inject(value.clone());
        Ok(value)
    }

    fn push_customization(&mut self, ty: TypeRef, builder: BuilderRef, via: &'static str) {
        self.customizations.insert(0, builder);
        tracing::debug!(%ty, via, total = self.customizations.len(), "customization registered");
    }

    // Registry access

    /// Customizations, highest priority first
    #[inline]
    #[must_use]
    pub fn customizations(&self) -> &[BuilderRef] {
        &self.customizations
    }

    /// Mutable customization list; index 0 is consulted first
    #[inline]
    pub fn customizations_mut(&mut self) -> &mut Vec<BuilderRef> {
        &mut self.customizations
    }

    /// Builders consulted after the engine
    #[inline]
    #[must_use]
    pub fn residue_collectors(&self) -> &[BuilderRef] {
        &self.residue_collectors
    }

    /// Mutable residue collector list
    #[inline]
    pub fn residue_collectors_mut(&mut self) -> &mut Vec<BuilderRef> {
        &mut self.residue_collectors
    }

    /// Behaviors, innermost first
    #[inline]
    #[must_use]
    pub fn behaviors(&self) -> &[BehaviorRef] {
        &self.behaviors
    }

    /// Mutable behavior list
    #[inline]
    pub fn behaviors_mut(&mut self) -> &mut Vec<BehaviorRef> {
        &mut self.behaviors
    }

    // Settings

    /// Items produced for `create_many` and sequence members
    #[inline]
    #[must_use]
    pub fn repeat_count(&self) -> usize {
        self.engine.multiple().count()
    }

    /// Change the repeat count
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidArgument`] for zero.
    pub fn set_repeat_count(&mut self, count: usize) -> Result<(), FixtureError> {
        self.engine.multiple().set_count(count)?;
        self.config.repeat_count = count;
        tracing::debug!(count, "repeat count changed");
        Ok(())
    }

    /// Replace the recursion policy, keeping the behavior's position
    pub fn set_recursion_policy(&mut self, policy: RecursionPolicy) {
        self.config.recursion_policy = policy;
        let behavior: BehaviorRef =
            Arc::new(RecursionBehavior::new(policy, self.config.recursion_depth));
        match self
            .behaviors
            .iter()
            .position(|b| b.name() == RecursionBehavior::NAME)
        {
            Some(index) => self.behaviors[index] = behavior,
            None => self.behaviors.push(behavior),
        }
        tracing::debug!(?policy, "recursion policy changed");
    }

    /// Install the collaborator that produces strings for regex constraints
    pub fn set_pattern_generator(&mut self, generator: Arc<dyn PatternGenerator>) {
        self.engine.patterns().set_generator(generator);
        tracing::debug!("pattern generator installed");
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::TracingBehavior;
    use pretty_assertions::assert_eq;
    use specimen_kernel::Dyn;

    #[test]
    fn customizations_are_prepended() {
        let mut fixture = Fixture::new();
        fixture.register(|| 1_u8);
        fixture.register(|| 2_u8);
        assert_eq!(fixture.customizations().len(), 2);
        assert_eq!(fixture.create::<u8>().unwrap(), 2);
    }

    #[test]
    fn customizations_can_be_removed() {
        let mut fixture = Fixture::new();
        fixture.register(|| 7_u16);
        fixture.customizations_mut().clear();
        assert_eq!(fixture.create::<u16>().unwrap(), 1);
    }

    #[test]
    fn injected_value_answers_seeded_requests() {
        let mut fixture = Fixture::new();
        fixture.inject("shared".to_string());
        assert_eq!(fixture.create_seeded::<String>("name").unwrap(), "shared");
        assert_eq!(fixture.create::<String>().unwrap(), "shared");
    }

    #[test]
    fn repeat_count_rejects_zero() {
        let mut fixture = Fixture::new();
        assert!(fixture.set_repeat_count(0).is_err());
        fixture.set_repeat_count(5).unwrap();
        assert_eq!(fixture.create_many::<u32>().unwrap().len(), 5);
        assert_eq!(fixture.config().repeat_count, 5);
    }

    #[test]
    fn recursion_policy_replaces_behavior_in_place() {
        let mut fixture = Fixture::new();
        fixture.behaviors_mut().push(Arc::new(TracingBehavior));
        fixture.set_recursion_policy(RecursionPolicy::Null);
        let names: Vec<_> = fixture.behaviors().iter().map(|b| b.name()).collect();
        assert_eq!(names, ["recursion", "tracing"]);
        assert_eq!(fixture.config().recursion_policy, RecursionPolicy::Null);
    }

    #[test]
    fn residue_collector_is_consulted_last() {
        trait Marker: std::fmt::Debug + Send + Sync {}
        #[derive(Debug)]
        struct Probe;
        impl Marker for Probe {}

        let mut fixture = Fixture::new();
        assert!(fixture.create::<Dyn<dyn Marker>>().is_err());

        let probe: Arc<dyn Marker> = Arc::new(Probe);
        fixture
            .residue_collectors_mut()
            .push(Arc::new(FixedBuilder::new(Dyn(probe))));
        assert_eq!(fixture.residue_collectors().len(), 1);
        assert!(fixture.create::<Dyn<dyn Marker>>().is_ok());
    }

    #[test]
    fn raw_resolution_reports_no_specimen() {
        let fixture = Fixture::new();
        let outcome = fixture
            .resolve(&Request::Pattern {
                pattern: "[a-z]+".into(),
            })
            .unwrap();
        assert!(outcome.is_no_specimen());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = Fixture::with_config(FixtureConfig::new().with_repeat_count(0)).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidConfiguration(_)));
    }
}
