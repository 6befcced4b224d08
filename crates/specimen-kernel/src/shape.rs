//! Type shapes - the introspection model
//!
//! Provides [`TypeRef`] and [`Shape`], an explicit description of how a type is
//! built: which constructors it offers, which members can be written after
//! construction, or which structural wrapper it is (optional, pointer,
//! sequence, map).

use crate::constraint::Constraint;
use crate::error::FixtureError;
use crate::introspect::Introspect;
use crate::request::{MemberInfo, MemberKind, ParameterInfo};
use crate::value::Value;
use std::any::{Any, TypeId};
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// Reference to an introspectable type
///
/// Equality and hashing use the [`TypeId`] only. The shape is evaluated
/// lazily so self-referencing types can name themselves.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
    shape: fn() -> Shape,
}

impl TypeRef {
    /// Reference to `T`
    #[inline]
    #[must_use]
    pub fn of<T: Introspect>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            shape: T::shape,
        }
    }

    /// Type identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name with module paths stripped
    #[must_use]
    pub fn short_name(&self) -> String {
        short_type_name(self.name)
    }

    /// Evaluate the shape
    #[inline]
    #[must_use]
    pub fn shape(&self) -> Shape {
        (self.shape)()
    }

    /// Check whether this refers to `T`
    #[inline]
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.name)
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// Strip module paths from a `std::any::type_name` rendering
///
/// `core::option::Option<alloc::string::String>` becomes `Option<String>`.
#[must_use]
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                segment.clear();
            }
            c if c.is_alphanumeric() || c == '_' => segment.push(c),
            c => {
                out.push_str(&segment);
                segment.clear();
                out.push(c);
            }
        }
    }
    out.push_str(&segment);
    out
}

/// Built-in value types with dedicated generators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `i128`
    I128,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `String`
    String,
    /// `uuid::Uuid`
    Uuid,
    /// `chrono::DateTime<Utc>`
    DateTime,
}

impl PrimitiveKind {
    /// Integer and floating point kinds
    #[inline]
    #[must_use]
    pub fn is_numeric(self) -> bool {
        self.is_integer() || matches!(self, Self::F32 | Self::F64)
    }

    /// Integer kinds
    #[inline]
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::I128
                | Self::Isize
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::U128
                | Self::Usize
        )
    }

    /// Largest positive whole number the kind represents exactly, capped at `u64::MAX`
    #[must_use]
    pub fn counter_limit(self) -> u64 {
        match self {
            Self::I8 => i8::MAX as u64,
            Self::I16 => i16::MAX as u64,
            Self::I32 => i32::MAX as u64,
            Self::I64 => i64::MAX as u64,
            Self::Isize => isize::MAX as u64,
            Self::U8 => u64::from(u8::MAX),
            Self::U16 => u64::from(u16::MAX),
            Self::U32 => u64::from(u32::MAX),
            Self::F32 => 1 << f32::MANTISSA_DIGITS,
            Self::F64 => 1 << f64::MANTISSA_DIGITS,
            _ => u64::MAX,
        }
    }

    /// Smallest and largest value of the kind as `f64`; unbounded for non-numeric kinds
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn numeric_bounds(self) -> (f64, f64) {
        match self {
            Self::I8 => (f64::from(i8::MIN), f64::from(i8::MAX)),
            Self::I16 => (f64::from(i16::MIN), f64::from(i16::MAX)),
            Self::I32 => (f64::from(i32::MIN), f64::from(i32::MAX)),
            Self::I64 => (i64::MIN as f64, i64::MAX as f64),
            Self::I128 => (i128::MIN as f64, i128::MAX as f64),
            Self::Isize => (isize::MIN as f64, isize::MAX as f64),
            Self::U8 => (0.0, f64::from(u8::MAX)),
            Self::U16 => (0.0, f64::from(u16::MAX)),
            Self::U32 => (0.0, f64::from(u32::MAX)),
            Self::U64 => (0.0, u64::MAX as f64),
            Self::U128 => (0.0, u128::MAX as f64),
            Self::Usize => (0.0, usize::MAX as f64),
            Self::F32 => (f64::from(f32::MIN), f64::from(f32::MAX)),
            _ => (f64::NEG_INFINITY, f64::INFINITY),
        }
    }

    /// Produce a numeric value of this kind from a whole number
    ///
    /// Returns `None` for non-numeric kinds. Callers keep `n` within
    /// [`Self::counter_limit`].
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_precision_loss)]
    #[must_use]
    pub fn numeric_value(self, n: u64) -> Option<Value> {
        let value = match self {
            Self::I8 => Value::new(n as i8),
            Self::I16 => Value::new(n as i16),
            Self::I32 => Value::new(n as i32),
            Self::I64 => Value::new(n as i64),
            Self::I128 => Value::new(i128::from(n)),
            Self::Isize => Value::new(n as isize),
            Self::U8 => Value::new(n as u8),
            Self::U16 => Value::new(n as u16),
            Self::U32 => Value::new(n as u32),
            Self::U64 => Value::new(n),
            Self::U128 => Value::new(u128::from(n)),
            Self::Usize => Value::new(n as usize),
            Self::F32 => Value::new(n as f32),
            Self::F64 => Value::new(n as f64),
            _ => return None,
        };
        Some(value)
    }

    /// Read a numeric value of this kind as `f64`
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn numeric_as_f64(self, value: &Value) -> Option<f64> {
        match self {
            Self::I8 => value.downcast_ref::<i8>().map(|v| f64::from(*v)),
            Self::I16 => value.downcast_ref::<i16>().map(|v| f64::from(*v)),
            Self::I32 => value.downcast_ref::<i32>().map(|v| f64::from(*v)),
            Self::I64 => value.downcast_ref::<i64>().map(|v| *v as f64),
            Self::I128 => value.downcast_ref::<i128>().map(|v| *v as f64),
            Self::Isize => value.downcast_ref::<isize>().map(|v| *v as f64),
            Self::U8 => value.downcast_ref::<u8>().map(|v| f64::from(*v)),
            Self::U16 => value.downcast_ref::<u16>().map(|v| f64::from(*v)),
            Self::U32 => value.downcast_ref::<u32>().map(|v| f64::from(*v)),
            Self::U64 => value.downcast_ref::<u64>().map(|v| *v as f64),
            Self::U128 => value.downcast_ref::<u128>().map(|v| *v as f64),
            Self::Usize => value.downcast_ref::<usize>().map(|v| *v as f64),
            Self::F32 => value.downcast_ref::<f32>().map(|v| f64::from(*v)),
            Self::F64 => value.downcast_ref::<f64>().copied(),
            _ => None,
        }
    }

    /// Produce a numeric value of this kind from an `f64`
    ///
    /// Integer kinds truncate toward zero and saturate at their bounds.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn numeric_from_f64(self, n: f64) -> Option<Value> {
        let value = match self {
            Self::I8 => Value::new(n as i8),
            Self::I16 => Value::new(n as i16),
            Self::I32 => Value::new(n as i32),
            Self::I64 => Value::new(n as i64),
            Self::I128 => Value::new(n as i128),
            Self::Isize => Value::new(n as isize),
            Self::U8 => Value::new(n as u8),
            Self::U16 => Value::new(n as u16),
            Self::U32 => Value::new(n as u32),
            Self::U64 => Value::new(n as u64),
            Self::U128 => Value::new(n as u128),
            Self::Usize => Value::new(n as usize),
            Self::F32 => Value::new(n as f32),
            Self::F64 => Value::new(n),
            _ => return None,
        };
        Some(value)
    }
}

/// Description of how a type is produced
#[derive(Clone)]
pub enum Shape {
    /// Built-in value type
    Primitive(PrimitiveKind),

    /// Enumeration with declared unit values
    Enum(EnumShape),

    /// Record built through constructors and writable members
    Object(ObjectShape),

    /// Interface or trait object; never constructed directly
    Abstract,

    /// `Option<T>`
    Optional(WrapperShape),

    /// `Box<T>`, `Arc<T>`
    Pointer(WrapperShape),

    /// Homogeneous collection
    Sequence(SequenceShape),

    /// Key/value collection
    Map(MapShape),
}

impl Shape {
    /// Short label for diagnostics
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Enum(_) => "enum",
            Self::Object(_) => "object",
            Self::Abstract => "abstract",
            Self::Optional(_) => "optional",
            Self::Pointer(_) => "pointer",
            Self::Sequence(_) => "sequence",
            Self::Map(_) => "map",
        }
    }

    /// The object shape, if this is one
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectShape> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl Debug for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "Primitive({kind:?})"),
            Self::Enum(e) => write!(f, "Enum({} values)", e.values.len()),
            Self::Object(o) => f
                .debug_struct("Object")
                .field("constructors", &o.constructors)
                .field("members", &o.members)
                .field("collection", &o.collection)
                .finish(),
            Self::Abstract => f.write_str("Abstract"),
            Self::Optional(w) => write!(f, "Optional({})", w.inner),
            Self::Pointer(w) => write!(f, "Pointer({})", w.inner),
            Self::Sequence(s) => write!(f, "Sequence({:?} of {})", s.kind, s.element),
            Self::Map(m) => write!(f, "Map({} => {})", m.key, m.value),
        }
    }
}

/// Declared values of an enumeration, in declaration order
#[derive(Clone)]
pub struct EnumShape {
    values: Vec<Value>,
}

impl EnumShape {
    /// Build from the declared values
    #[must_use]
    pub fn from_values<T: Introspect>(values: impl IntoIterator<Item = T>) -> Shape {
        Shape::Enum(Self {
            values: values.into_iter().map(Value::new).collect(),
        })
    }

    /// Declared values
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

type InvokeFn = dyn Fn(&mut Arguments) -> Result<Value, FixtureError> + Send + Sync;
type AssignFn = dyn Fn(&mut dyn Any, Value) -> Result<(), FixtureError> + Send + Sync;

/// A way to construct a type from resolved parameters
#[derive(Clone)]
pub struct Constructor {
    owner: TypeRef,
    name: &'static str,
    parameters: Vec<ParameterInfo>,
    invoke: Arc<InvokeFn>,
}

impl Constructor {
    /// Owning type
    #[inline]
    #[must_use]
    pub fn owner(&self) -> TypeRef {
        self.owner
    }

    /// Constructor name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parameters in declaration order
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    /// Number of parameters
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Invoke with arguments resolved in parameter order
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidArgument`] on an argument count mismatch,
    /// or whatever the constructor body reports.
    pub fn invoke(&self, arguments: Vec<Value>) -> Result<Value, FixtureError> {
        if arguments.len() != self.parameters.len() {
            return Err(FixtureError::invalid_argument(format!(
                "{}::{} takes {} arguments, {} supplied",
                self.owner,
                self.name,
                self.parameters.len(),
                arguments.len()
            )));
        }
        let mut args = Arguments::new(self.owner.name(), self.name, arguments);
        (self.invoke)(&mut args)
    }
}

impl Debug for Constructor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let params: Vec<_> = self
            .parameters
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .collect();
        write!(f, "{}({})", self.name, params.join(", "))
    }
}

/// A writable member populated after construction
#[derive(Clone)]
pub struct Member {
    info: MemberInfo,
    assign: Arc<AssignFn>,
}

impl Member {
    /// Member descriptor
    #[inline]
    #[must_use]
    pub fn info(&self) -> &MemberInfo {
        &self.info
    }

    /// Member name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.info.name
    }

    /// Assign `value` to this member of `target`
    ///
    /// # Errors
    /// Returns [`FixtureError::TypeMismatch`] if either the target or the value
    /// is not of the declared type.
    pub fn assign(&self, target: &mut dyn Any, value: Value) -> Result<(), FixtureError> {
        (self.assign)(target, value)
    }
}

impl Debug for Member {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}: {}", self.info.kind, self.info.name, self.info.ty)
    }
}

/// Constructors, writable members and declared interfaces of a record type
#[derive(Clone)]
pub struct ObjectShape {
    owner: TypeRef,
    constructors: Vec<Constructor>,
    members: Vec<Member>,
    interfaces: Vec<TypeRef>,
    collection: bool,
}

impl ObjectShape {
    /// Start describing `T`
    #[inline]
    #[must_use]
    pub fn builder<T: Introspect>() -> ObjectShapeBuilder<T> {
        ObjectShapeBuilder {
            shape: Self {
                owner: TypeRef::of::<T>(),
                constructors: Vec::new(),
                members: Vec::new(),
                interfaces: Vec::new(),
                collection: false,
            },
            _marker: PhantomData,
        }
    }

    /// Described type
    #[inline]
    #[must_use]
    pub fn owner(&self) -> TypeRef {
        self.owner
    }

    /// Constructors in declaration order
    #[inline]
    #[must_use]
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Writable members in declaration order
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Look up a writable member by name
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.info.name == name)
    }

    /// Abstract seams this type can stand in for
    #[inline]
    #[must_use]
    pub fn interfaces(&self) -> &[TypeRef] {
        &self.interfaces
    }

    /// Whether the type is a custom collection
    #[inline]
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.collection
    }
}

/// Constructor parameter declaration used with [`ObjectShapeBuilder::constructor`]
#[derive(Debug, Clone)]
pub struct Param {
    name: &'static str,
    ty: TypeRef,
    constraint: Option<Constraint>,
}

impl Param {
    /// Attach a value constraint
    #[inline]
    #[must_use]
    pub fn constrained(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }
}

/// Declare a constructor parameter named `name` of type `T`
#[inline]
#[must_use]
pub fn param<T: Introspect>(name: &'static str) -> Param {
    Param {
        name,
        ty: TypeRef::of::<T>(),
        constraint: None,
    }
}

/// Fluent builder for [`ObjectShape`]
///
/// # Example
/// ```
/// use specimen_kernel::{param, Introspect, ObjectShape, Shape};
///
/// #[derive(Debug, Clone, Default)]
/// struct Person {
///     name: String,
///     age: u32,
///     email: String,
/// }
///
/// impl Introspect for Person {
///     fn shape() -> Shape {
///         ObjectShape::builder::<Self>()
///             .constructor("new", vec![param::<String>("name"), param::<u32>("age")], |args| {
///                 Ok(Person { name: args.take()?, age: args.take()?, email: String::new() })
///             })
///             .property("email", |p: &mut Person, v: String| p.email = v)
///             .build()
///     }
/// }
/// ```
pub struct ObjectShapeBuilder<T> {
    shape: ObjectShape,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Introspect> ObjectShapeBuilder<T> {
    /// Add a constructor; declaration order is preserved
    #[must_use]
    pub fn constructor<F>(mut self, name: &'static str, params: Vec<Param>, body: F) -> Self
    where
        F: Fn(&mut Arguments) -> Result<T, FixtureError> + Send + Sync + 'static,
    {
        let owner = self.shape.owner;
        let parameters = params
            .into_iter()
            .enumerate()
            .map(|(position, p)| ParameterInfo {
                owner,
                constructor: name,
                position,
                name: p.name,
                ty: p.ty,
                constraint: p.constraint,
            })
            .collect();
        self.shape.constructors.push(Constructor {
            owner,
            name,
            parameters,
            invoke: Arc::new(move |args| body(args).map(Value::new)),
        });
        self
    }

    /// Add a writable property
    #[must_use]
    pub fn property<V, F>(self, name: &'static str, setter: F) -> Self
    where
        V: Introspect,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.member(name, MemberKind::Property, None, setter)
    }

    /// Add a writable property whose values are constrained
    #[must_use]
    pub fn property_with<V, F>(self, name: &'static str, constraint: Constraint, setter: F) -> Self
    where
        V: Introspect,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.member(name, MemberKind::Property, Some(constraint), setter)
    }

    /// Add a writable field
    #[must_use]
    pub fn field<V, F>(self, name: &'static str, setter: F) -> Self
    where
        V: Introspect,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.member(name, MemberKind::Field, None, setter)
    }

    /// Add a writable field whose values are constrained
    #[must_use]
    pub fn field_with<V, F>(self, name: &'static str, constraint: Constraint, setter: F) -> Self
    where
        V: Introspect,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.member(name, MemberKind::Field, Some(constraint), setter)
    }

    fn member<V, F>(
        mut self,
        name: &'static str,
        kind: MemberKind,
        constraint: Option<Constraint>,
        setter: F,
    ) -> Self
    where
        V: Introspect,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let info = MemberInfo {
            owner: self.shape.owner,
            name,
            kind,
            ty: TypeRef::of::<V>(),
            constraint,
        };
        let assign = move |target: &mut dyn Any, value: Value| -> Result<(), FixtureError> {
            let target = target
                .downcast_mut::<T>()
                .ok_or(FixtureError::TypeMismatch {
                    expected: std::any::type_name::<T>(),
                    actual: "foreign target",
                })?;
            setter(target, value.downcast::<V>()?);
            Ok(())
        };
        self.shape.members.push(Member {
            info,
            assign: Arc::new(assign),
        });
        self
    }

    /// Declare that `T` can stand in for the abstract seam `I`
    #[must_use]
    pub fn implements<I: Introspect>(mut self) -> Self {
        self.shape.interfaces.push(TypeRef::of::<I>());
        self
    }

    /// Mark `T` as a custom collection
    #[must_use]
    pub fn collection(mut self) -> Self {
        self.shape.collection = true;
        self
    }

    /// Finish
    #[must_use]
    pub fn build(self) -> Shape {
        Shape::Object(self.shape)
    }
}

/// Resolved constructor arguments, consumed in parameter order
#[derive(Debug)]
pub struct Arguments {
    owner: &'static str,
    constructor: &'static str,
    values: std::vec::IntoIter<Value>,
}

impl Arguments {
    /// Wrap resolved values
    #[must_use]
    pub fn new(owner: &'static str, constructor: &'static str, values: Vec<Value>) -> Self {
        Self {
            owner,
            constructor,
            values: values.into_iter(),
        }
    }

    /// Take the next argument as `T`
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidArgument`] when arguments are exhausted
    /// and [`FixtureError::TypeMismatch`] when the next one is not a `T`.
    pub fn take<T: Any>(&mut self) -> Result<T, FixtureError> {
        let value = self.values.next().ok_or_else(|| {
            FixtureError::invalid_argument(format!(
                "{}::{} ran out of arguments",
                short_type_name(self.owner),
                self.constructor
            ))
        })?;
        value.downcast::<T>()
    }

    /// Number of arguments not yet taken
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

/// `Option<T>`, `Box<T>` and `Arc<T>`: a single inner type plus wrapping
#[derive(Clone, Copy)]
pub struct WrapperShape {
    /// Wrapped type
    pub inner: TypeRef,
    /// Wrap a resolved inner value
    pub wrap: fn(Value) -> Result<Value, FixtureError>,
    /// The empty value, for nullable wrappers
    pub empty: Option<fn() -> Value>,
}

/// Shape of a sequence container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    /// `[T; N]`, `Box<[T]>`
    Array,
    /// `Vec<T>`
    List,
    /// `VecDeque<T>`
    Deque,
    /// `HashSet<T>`, `BTreeSet<T>`
    Set,
}

/// Homogeneous collection description
#[derive(Clone, Copy)]
pub struct SequenceShape {
    /// Element type
    pub element: TypeRef,
    /// Container kind
    pub kind: SequenceKind,
    /// Fixed length, for arrays
    pub len: Option<usize>,
    /// Build the container from resolved elements
    pub collect: fn(Vec<Value>) -> Result<Value, FixtureError>,
}

/// Key/value collection description
#[derive(Clone, Copy)]
pub struct MapShape {
    /// Key type
    pub key: TypeRef,
    /// Value type
    pub value: TypeRef,
    /// Build the map from resolved pairs
    pub collect: fn(Vec<(Value, Value)>) -> Result<Value, FixtureError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
        label: String,
    }

    impl Introspect for Point {
        fn shape() -> Shape {
            ObjectShape::builder::<Self>()
                .constructor("origin", vec![], |_| Ok(Point::default()))
                .constructor("new", vec![param::<i32>("x"), param::<i32>("y")], |args| {
                    Ok(Point {
                        x: args.take()?,
                        y: args.take()?,
                        label: String::new(),
                    })
                })
                .property("label", |p: &mut Point, v: String| p.label = v)
                .build()
        }
    }

    #[test]
    fn short_names_strip_paths() {
        assert_eq!(short_type_name("alloc::string::String"), "String");
        assert_eq!(
            short_type_name("core::option::Option<alloc::boxed::Box<my_crate::Node>>"),
            "Option<Box<Node>>"
        );
        assert_eq!(
            short_type_name("std::collections::hash::map::HashMap<u8, alloc::string::String>"),
            "HashMap<u8, String>"
        );
    }

    #[test]
    fn type_ref_equality_uses_type_id() {
        assert_eq!(TypeRef::of::<Point>(), TypeRef::of::<Point>());
        assert_ne!(TypeRef::of::<Point>(), TypeRef::of::<String>());
        assert!(TypeRef::of::<Point>().is::<Point>());
        assert_eq!(TypeRef::of::<Point>().to_string(), "Point");
    }

    #[test]
    fn object_shape_keeps_declaration_order() {
        let shape = Point::shape();
        let object = shape.as_object().unwrap();
        let names: Vec<_> = object.constructors().iter().map(Constructor::name).collect();
        assert_eq!(names, vec!["origin", "new"]);
        assert_eq!(object.constructors()[1].arity(), 2);
        assert_eq!(object.constructors()[1].parameters()[1].name, "y");
        assert_eq!(object.members()[0].name(), "label");
    }

    #[test]
    fn constructor_invokes_with_arguments() {
        let shape = Point::shape();
        let ctor = &shape.as_object().unwrap().constructors()[1];
        let point = ctor
            .invoke(vec![Value::new(3_i32), Value::new(4_i32)])
            .unwrap()
            .downcast::<Point>()
            .unwrap();
        assert_eq!((point.x, point.y), (3, 4));
    }

    #[test]
    fn constructor_rejects_wrong_arity() {
        let shape = Point::shape();
        let ctor = &shape.as_object().unwrap().constructors()[1];
        let err = ctor.invoke(vec![Value::new(3_i32)]).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidArgument(_)));
    }

    #[test]
    fn member_assigns_typed_value() {
        let shape = Point::shape();
        let member = shape.as_object().unwrap().member("label").unwrap().clone();
        let mut point = Point::default();
        member
            .assign(&mut point, Value::new("north".to_string()))
            .unwrap();
        assert_eq!(point.label, "north");

        let err = member.assign(&mut point, Value::new(1_u8)).unwrap_err();
        assert!(matches!(err, FixtureError::TypeMismatch { .. }));
    }

    #[test]
    fn numeric_kinds_round_trip_through_f64() {
        let value = PrimitiveKind::U16.numeric_value(12).unwrap();
        assert_eq!(value.downcast_ref::<u16>(), Some(&12));
        assert_eq!(PrimitiveKind::U16.numeric_as_f64(&value), Some(12.0));
        assert!(PrimitiveKind::String.numeric_value(1).is_none());
        assert_eq!(PrimitiveKind::I8.counter_limit(), 127);
    }
}
