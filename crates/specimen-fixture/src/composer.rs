//! Per-type customization
//!
//! A [`Composer`] collects construction and population rules for one type and
//! turns them into a builder that answers type and seeded requests for exactly
//! that type. Composers come from [`Fixture::build`] (one-off creation) and
//! [`Fixture::customize`] (registered for every later request).
//!
//! Member names are checked while the composer is assembled; the first bad name
//! is reported when the composer is finished, before any resolution starts.

use crate::fixture::Fixture;
use specimen_builders::{
    ActionCommand, AutoPropertiesCommand, BindingCommand, BuilderRef, ExactTypeSpecification,
    FilteringBuilder, MethodInvoker, OrSpecification, Postprocessor, SeededSpecification,
    SpecimenBuilder, SpecimenCommand, SpecimenContext,
};
use specimen_kernel::{FixtureError, Introspect, Request, Seed, Specimen, TypeRef, Value};
use std::any::TypeId;
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;

type Factory = dyn Fn(&dyn SpecimenContext) -> Result<Value, FixtureError> + Send + Sync;
type SeedFactory = dyn Fn(&Seed) -> Value + Send + Sync;

/// How the composed type gets its initial instance
#[derive(Clone)]
pub(crate) enum Construction {
    /// Cheapest satisfiable constructor
    Invoke,
    /// User factory, seed ignored
    Factory(Arc<Factory>),
    /// User factory for seeded requests; plain requests invoke a constructor
    Seeded(Arc<SeedFactory>),
}

impl Debug for Construction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoke => f.write_str("Invoke"),
            Self::Factory(_) => f.write_str("Factory"),
            Self::Seeded(_) => f.write_str("Seeded"),
        }
    }
}

impl Construction {
    /// Construction from a context-free factory
    pub(crate) fn factory<T, F>(factory: F) -> Self
    where
        T: Introspect,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(move |_| Ok(Value::new(factory()))))
    }

    /// Construction from a factory that resolves its own dependencies
    pub(crate) fn factory_with<T, F>(factory: F) -> Self
    where
        T: Introspect,
        F: Fn(&dyn SpecimenContext) -> Result<T, FixtureError> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(move |context| factory(context).map(Value::new)))
    }
}

#[derive(Debug)]
struct ConstructionBuilder {
    ty: TypeRef,
    construction: Construction,
    invoker: MethodInvoker,
}

impl SpecimenBuilder for ConstructionBuilder {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        match (&self.construction, request) {
            (Construction::Factory(factory), _) => factory(context).map(Specimen::Value),
            (Construction::Seeded(factory), Request::Seeded { seed, .. }) => {
                Ok(Specimen::Value(factory(seed)))
            }
            _ => self.invoker.create(&Request::Type(self.ty), context),
        }
    }
}

/// Builder answering type and seeded requests for `ty`
pub(crate) fn node(
    ty: TypeRef,
    construction: Construction,
    commands: Vec<Arc<dyn SpecimenCommand>>,
) -> BuilderRef {
    let base = ConstructionBuilder {
        ty,
        construction,
        invoker: MethodInvoker::modest(),
    };
    let scope = OrSpecification(vec![
        Arc::new(ExactTypeSpecification(ty)),
        Arc::new(SeededSpecification(ty)),
    ]);
    if commands.is_empty() {
        Arc::new(FilteringBuilder::new(base, scope))
    } else {
        Arc::new(FilteringBuilder::new(
            Postprocessor::with_commands(Arc::new(base), commands),
            scope,
        ))
    }
}

/// Construction and population rules for `T`
pub struct Composer<'f, T> {
    fixture: &'f Fixture,
    construction: Construction,
    auto_properties: bool,
    strict: bool,
    excluded: Vec<String>,
    commands: Vec<Arc<dyn SpecimenCommand>>,
    error: Option<FixtureError>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Debug for Composer<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("type", &std::any::type_name::<T>())
            .field("construction", &self.construction)
            .field("auto_properties", &self.auto_properties)
            .field("excluded", &self.excluded)
            .field("commands", &self.commands)
            .field("error", &self.error)
            .finish()
    }
}

impl<'f, T: Introspect> Composer<'f, T> {
    pub(crate) fn new(fixture: &'f Fixture) -> Self {
        let config = fixture.config();
        Self {
            fixture,
            construction: Construction::Invoke,
            auto_properties: !config.omit_auto_properties,
            strict: config.strict_members,
            excluded: Vec::new(),
            commands: Vec::new(),
            error: None,
            _marker: PhantomData,
        }
    }

    /// Check `member` exists on `T` and, when given, accepts values of `value_type`
    fn check_member(&mut self, member: &str, value_type: Option<(TypeId, &'static str)>) -> bool {
        if self.error.is_some() {
            return false;
        }
        let ty = TypeRef::of::<T>();
        let shape = ty.shape();
        let Some(found) = shape.as_object().and_then(|o| o.member(member)) else {
            self.error = Some(FixtureError::MemberNotFound {
                ty: ty.name(),
                member: member.to_string(),
            });
            return false;
        };
        if let Some((id, name)) = value_type {
            if found.info().ty.id() != id {
                self.error = Some(FixtureError::TypeMismatch {
                    expected: found.info().ty.name(),
                    actual: name,
                });
                return false;
            }
        }
        true
    }

    /// Set `member` to a clone of `value` on every instance
    #[must_use]
    pub fn with<V: Introspect>(mut self, member: &str, value: V) -> Self {
        if self.check_member(member, Some((TypeId::of::<V>(), std::any::type_name::<V>()))) {
            self.excluded.push(member.to_string());
            self.commands.push(Arc::new(BindingCommand::fixed(member, value)));
        }
        self
    }

    /// Set `member` to a fresh value from `factory` on every instance
    #[must_use]
    pub fn with_factory<V, F>(mut self, member: &str, factory: F) -> Self
    where
        V: Introspect,
        F: Fn() -> V + Send + Sync + 'static,
    {
        if self.check_member(member, Some((TypeId::of::<V>(), std::any::type_name::<V>()))) {
            self.excluded.push(member.to_string());
            self.commands.push(Arc::new(BindingCommand::factory(member, factory)));
        }
        self
    }

    /// Resolve `member` once and share the value across instances
    #[must_use]
    pub fn freeze_member(mut self, member: &str) -> Self {
        if self.check_member(member, None) {
            self.excluded.push(member.to_string());
            self.commands.push(Arc::new(BindingCommand::frozen(member)));
        }
        self
    }

    /// Leave `member` unpopulated
    #[must_use]
    pub fn without(mut self, member: &str) -> Self {
        if self.check_member(member, None) {
            self.excluded.push(member.to_string());
        }
        self
    }

    /// Run `action` on every instance after population
    #[must_use]
    pub fn perform<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.commands.push(Arc::new(ActionCommand::new::<T, F>(action)));
        self
    }

    /// Skip member population
    #[inline]
    #[must_use]
    pub fn omit_auto_properties(mut self) -> Self {
        self.auto_properties = false;
        self
    }

    /// Populate members even when the fixture omits them by default
    #[inline]
    #[must_use]
    pub fn with_auto_properties(mut self) -> Self {
        self.auto_properties = true;
        self
    }

    /// Construct instances with `factory` instead of a constructor
    #[must_use]
    pub fn from_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.construction = Construction::factory(factory);
        self
    }

    /// Construct instances with a factory that resolves its own inputs
    #[must_use]
    pub fn from_factory_with<F>(mut self, factory: F) -> Self
    where
        F: Fn(&dyn SpecimenContext) -> Result<T, FixtureError> + Send + Sync + 'static,
    {
        self.construction = Construction::factory_with(factory);
        self
    }

    /// Construct seeded instances from their seed
    ///
    /// Unseeded requests still go through the constructor.
    #[must_use]
    pub fn from_seed_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Seed) -> T + Send + Sync + 'static,
    {
        self.construction = Construction::Seeded(Arc::new(move |seed| Value::new(factory(seed))));
        self
    }

    /// Finish into a builder
    ///
    /// # Errors
    /// Returns the first member error recorded while composing.
    pub(crate) fn into_node(self) -> Result<BuilderRef, FixtureError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let mut commands: Vec<Arc<dyn SpecimenCommand>> = Vec::with_capacity(self.commands.len() + 1);
        if self.auto_properties {
            commands.push(Arc::new(
                AutoPropertiesCommand::new()
                    .excluding(self.excluded)
                    .strict(self.strict),
            ));
        }
        commands.extend(self.commands);
        Ok(node(TypeRef::of::<T>(), self.construction, commands))
    }

    /// Create one instance with these rules
    ///
    /// # Errors
    /// Member errors recorded while composing, or any creation failure.
    pub fn create(self) -> Result<T, FixtureError> {
        let fixture = self.fixture;
        let node = self.into_node()?;
        fixture.create_through::<T>(Request::of::<T>(), Some(node))
    }

    /// Create `count` instances sharing these rules
    ///
    /// # Errors
    /// See [`Self::create`].
    pub fn create_many(self, count: usize) -> Result<Vec<T>, FixtureError> {
        let fixture = self.fixture;
        let node = self.into_node()?;
        fixture.create_sequence_through::<T>(Request::of::<T>(), count, Some(node))
    }
}
