//! Post-construction commands
//!
//! A [`Postprocessor`] lets its inner builder construct a specimen and then
//! runs [`SpecimenCommand`]s against it: auto-population of writable members,
//! fixed member bindings and arbitrary actions.

use crate::builder::{BuilderRef, SpecimenBuilder, SpecimenContext};
use parking_lot::Mutex;
use specimen_kernel::{FixtureError, Introspect, MemberKind, Request, Specimen, TypeRef, Value};
use std::any::Any;
use std::collections::HashSet;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Action applied to a freshly built specimen
pub trait SpecimenCommand: Send + Sync + Debug {
    /// Run against `specimen`, produced for `request`
    ///
    /// # Errors
    /// Hard failures abort the enclosing resolution.
    fn execute(
        &self,
        specimen: &mut Value,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<(), FixtureError>;
}

/// Runs commands after the inner builder produced a value
#[derive(Debug, Clone)]
pub struct Postprocessor {
    builder: BuilderRef,
    commands: Vec<Arc<dyn SpecimenCommand>>,
}

impl Postprocessor {
    /// Wrap `builder` with a single command
    #[must_use]
    pub fn new(builder: impl SpecimenBuilder + 'static, command: impl SpecimenCommand + 'static) -> Self {
        Self {
            builder: Arc::new(builder),
            commands: vec![Arc::new(command)],
        }
    }

    /// Wrap a shared builder with commands run in order
    #[must_use]
    pub fn with_commands(builder: BuilderRef, commands: Vec<Arc<dyn SpecimenCommand>>) -> Self {
        Self { builder, commands }
    }
}

impl SpecimenBuilder for Postprocessor {
    fn create(
        &self,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<Specimen, FixtureError> {
        match self.builder.create(request, context)? {
            Specimen::Value(mut value) => {
                for command in &self.commands {
                    command.execute(&mut value, request, context)?;
                }
                Ok(Specimen::Value(value))
            }
            other => Ok(other),
        }
    }
}

/// Resolve the shape of the value a request produced, if it is a record
fn object_type(specimen: &Value, request: &Request) -> Option<TypeRef> {
    request
        .target_type()
        .filter(|ty| ty.id() == specimen.type_id())
}

/// Populate writable members in declaration order
///
/// Members that resolve to nothing are skipped unless the command is strict.
#[derive(Debug, Clone, Default)]
pub struct AutoPropertiesCommand {
    excluded: HashSet<String>,
    strict: bool,
}

impl AutoPropertiesCommand {
    /// Best-effort population of every writable member
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the named members
    #[must_use]
    pub fn excluding<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(members.into_iter().map(Into::into));
        self
    }

    /// Fail when a member cannot be resolved
    #[inline]
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl SpecimenCommand for AutoPropertiesCommand {
    fn execute(
        &self,
        specimen: &mut Value,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<(), FixtureError> {
        let Some(ty) = object_type(specimen, request) else {
            return Ok(());
        };
        let shape = ty.shape();
        let Some(object) = shape.as_object() else {
            return Ok(());
        };

        for member in object.members() {
            if self.excluded.contains(member.name()) {
                continue;
            }
            let info = member.info().clone();
            let member_request = match info.kind {
                MemberKind::Property => Request::Property(info),
                MemberKind::Field => Request::Field(info),
            };
            match context.resolve(&member_request)? {
                Specimen::Value(value) => member.assign(specimen.as_any_mut(), value)?,
                Specimen::Omit | Specimen::Null => {
                    tracing::trace!(member = member.name(), owner = %ty, "member left unset");
                }
                Specimen::NoSpecimen if self.strict => {
                    return Err(FixtureError::ObjectCreationFailed {
                        request: request.to_string(),
                        path: vec![request.to_string(), member_request.to_string()],
                    });
                }
                Specimen::NoSpecimen => {
                    tracing::warn!(member = member.name(), owner = %ty, "no specimen for member, skipped");
                }
            }
        }
        Ok(())
    }
}

type ValueFactory = dyn Fn(&dyn SpecimenContext) -> Result<Value, FixtureError> + Send + Sync;

/// Where a bound member gets its value
#[derive(Clone)]
pub enum BindingSource {
    /// Clone of a fixed value
    Fixed(Value),

    /// Fresh value from a factory on every build
    Factory(Arc<ValueFactory>),

    /// Resolved through the pipeline once, then reused
    Frozen(Arc<Mutex<Option<Value>>>),
}

impl Debug for BindingSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => write!(f, "Fixed({value:?})"),
            Self::Factory(_) => f.write_str("Factory"),
            Self::Frozen(cell) => write!(f, "Frozen({:?})", cell.lock()),
        }
    }
}

/// Assign a value to one named member
#[derive(Debug, Clone)]
pub struct BindingCommand {
    member: String,
    source: BindingSource,
}

impl BindingCommand {
    /// Bind `member` to a clone of `value`
    #[must_use]
    pub fn fixed<V: Introspect>(member: impl Into<String>, value: V) -> Self {
        Self {
            member: member.into(),
            source: BindingSource::Fixed(Value::new(value)),
        }
    }

    /// Bind `member` to a fresh value from `factory` on every build
    #[must_use]
    pub fn factory<V, F>(member: impl Into<String>, factory: F) -> Self
    where
        V: Introspect,
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self {
            member: member.into(),
            source: BindingSource::Factory(Arc::new(move |_| Ok(Value::new(factory())))),
        }
    }

    /// Bind `member` to a value resolved once and then reused
    #[must_use]
    pub fn frozen(member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            source: BindingSource::Frozen(Arc::new(Mutex::new(None))),
        }
    }

    /// Bound member name
    #[inline]
    #[must_use]
    pub fn member(&self) -> &str {
        &self.member
    }
}

impl SpecimenCommand for BindingCommand {
    fn execute(
        &self,
        specimen: &mut Value,
        request: &Request,
        context: &dyn SpecimenContext,
    ) -> Result<(), FixtureError> {
        let Some(ty) = object_type(specimen, request) else {
            return Ok(());
        };
        let shape = ty.shape();
        let member = shape
            .as_object()
            .and_then(|o| o.member(&self.member))
            .ok_or_else(|| FixtureError::MemberNotFound {
                ty: ty.name(),
                member: self.member.clone(),
            })?;

        let value = match &self.source {
            BindingSource::Fixed(value) => value.clone(),
            BindingSource::Factory(factory) => factory(context)?,
            BindingSource::Frozen(cell) => {
                let cached = cell.lock().clone();
                if let Some(value) = cached {
                    value
                } else {
                    let info = member.info().clone();
                    let member_request = match info.kind {
                        MemberKind::Property => Request::Property(info),
                        MemberKind::Field => Request::Field(info),
                    };
                    let Some(value) = context.resolve(&member_request)?.into_value() else {
                        return Err(FixtureError::ObjectCreationFailed {
                            request: member_request.to_string(),
                            path: vec![request.to_string(), member_request.to_string()],
                        });
                    };
                    *cell.lock() = Some(value.clone());
                    value
                }
            }
        };
        member.assign(specimen.as_any_mut(), value)
    }
}

type Action = dyn Fn(&mut dyn Any) -> Result<(), FixtureError> + Send + Sync;

/// Run a closure against the typed specimen
#[derive(Clone)]
pub struct ActionCommand {
    action: Arc<Action>,
}

impl ActionCommand {
    /// Run `action` against every built `T`
    #[must_use]
    pub fn new<T, F>(action: F) -> Self
    where
        T: Introspect,
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        let action = move |target: &mut dyn Any| -> Result<(), FixtureError> {
            let target = target
                .downcast_mut::<T>()
                .ok_or(FixtureError::TypeMismatch {
                    expected: std::any::type_name::<T>(),
                    actual: "foreign specimen",
                })?;
            action(target);
            Ok(())
        };
        Self {
            action: Arc::new(action),
        }
    }
}

impl Debug for ActionCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("ActionCommand")
    }
}

impl SpecimenCommand for ActionCommand {
    fn execute(
        &self,
        specimen: &mut Value,
        _request: &Request,
        _context: &dyn SpecimenContext,
    ) -> Result<(), FixtureError> {
        (self.action)(specimen.as_any_mut())
    }
}
