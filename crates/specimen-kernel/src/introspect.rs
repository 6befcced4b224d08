//! The [`Introspect`] capability and its implementations for std types
//!
//! A type is buildable when it can describe its [`Shape`]. Primitives,
//! wrappers and collections are covered here; records implement it by hand
//! with [`ObjectShape::builder`](crate::ObjectShape::builder).

use crate::error::FixtureError;
use crate::shape::{
    param, MapShape, ObjectShape, PrimitiveKind, SequenceKind, SequenceShape, Shape, TypeRef,
    WrapperShape,
};
use crate::value::Value;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;
use uuid::Uuid;

/// A type that can describe how it is built
pub trait Introspect: Any + Clone + Debug + Send + Sync {
    /// Describe the type
    fn shape() -> Shape;
}

macro_rules! primitive_introspect {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Introspect for $ty {
                fn shape() -> Shape {
                    Shape::Primitive(PrimitiveKind::$kind)
                }
            }
        )*
    };
}

primitive_introspect! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    String => String,
    Uuid => Uuid,
    DateTime<Utc> => DateTime,
}

/// Shared handle to an abstract seam, such as a trait object
///
/// `Dyn<dyn Clock>` has an abstract shape: the engine never constructs it, so
/// requests for it fail unless a factory is registered.
pub struct Dyn<T: ?Sized>(pub Arc<T>);

impl<T: ?Sized> Dyn<T> {
    /// Wrap a shared handle
    #[inline]
    #[must_use]
    pub fn new(inner: Arc<T>) -> Self {
        Self(inner)
    }
}

impl<T: ?Sized> Clone for Dyn<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized + Debug> Debug for Dyn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dyn").field(&&*self.0).finish()
    }
}

impl<T: ?Sized> std::ops::Deref for Dyn<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + Debug + Send + Sync + 'static> Introspect for Dyn<T> {
    fn shape() -> Shape {
        Shape::Abstract
    }
}

fn wrap_some<T: Introspect>(value: Value) -> Result<Value, FixtureError> {
    Ok(Value::new(Some(value.downcast::<T>()?)))
}

fn none<T: Introspect>() -> Value {
    Value::new(Option::<T>::None)
}

fn wrap_box<T: Introspect>(value: Value) -> Result<Value, FixtureError> {
    Ok(Value::new(Box::new(value.downcast::<T>()?)))
}

fn wrap_arc<T: Introspect>(value: Value) -> Result<Value, FixtureError> {
    Ok(Value::new(Arc::new(value.downcast::<T>()?)))
}

impl<T: Introspect> Introspect for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(WrapperShape {
            inner: TypeRef::of::<T>(),
            wrap: wrap_some::<T>,
            empty: Some(none::<T>),
        })
    }
}

impl<T: Introspect> Introspect for Box<T> {
    fn shape() -> Shape {
        Shape::Pointer(WrapperShape {
            inner: TypeRef::of::<T>(),
            wrap: wrap_box::<T>,
            empty: None,
        })
    }
}

impl<T: Introspect> Introspect for Arc<T> {
    fn shape() -> Shape {
        Shape::Pointer(WrapperShape {
            inner: TypeRef::of::<T>(),
            wrap: wrap_arc::<T>,
            empty: None,
        })
    }
}

fn downcast_elements<T: Introspect>(elements: Vec<Value>) -> Result<Vec<T>, FixtureError> {
    elements.into_iter().map(Value::downcast::<T>).collect()
}

fn collect_vec<T: Introspect>(elements: Vec<Value>) -> Result<Value, FixtureError> {
    downcast_elements::<T>(elements).map(Value::new)
}

fn collect_deque<T: Introspect>(elements: Vec<Value>) -> Result<Value, FixtureError> {
    downcast_elements::<T>(elements).map(|v| Value::new(VecDeque::from(v)))
}

fn collect_boxed_slice<T: Introspect>(elements: Vec<Value>) -> Result<Value, FixtureError> {
    downcast_elements::<T>(elements).map(|v| Value::new(v.into_boxed_slice()))
}

fn collect_array<T: Introspect, const N: usize>(
    elements: Vec<Value>,
) -> Result<Value, FixtureError> {
    let items = downcast_elements::<T>(elements)?;
    let found = items.len();
    <[T; N]>::try_from(items).map(Value::new).map_err(|_| {
        FixtureError::invalid_argument(format!("array of {N} elements built from {found}"))
    })
}

fn collect_hash_set<T: Introspect + Eq + Hash>(
    elements: Vec<Value>,
) -> Result<Value, FixtureError> {
    downcast_elements::<T>(elements).map(|v| Value::new(v.into_iter().collect::<HashSet<T>>()))
}

fn collect_btree_set<T: Introspect + Ord>(elements: Vec<Value>) -> Result<Value, FixtureError> {
    downcast_elements::<T>(elements).map(|v| Value::new(v.into_iter().collect::<BTreeSet<T>>()))
}

fn downcast_pairs<K: Introspect, V: Introspect>(
    pairs: Vec<(Value, Value)>,
) -> Result<Vec<(K, V)>, FixtureError> {
    pairs
        .into_iter()
        .map(|(k, v)| Ok((k.downcast::<K>()?, v.downcast::<V>()?)))
        .collect()
}

fn collect_hash_map<K: Introspect + Eq + Hash, V: Introspect>(
    pairs: Vec<(Value, Value)>,
) -> Result<Value, FixtureError> {
    downcast_pairs::<K, V>(pairs).map(|p| Value::new(p.into_iter().collect::<HashMap<K, V>>()))
}

fn collect_btree_map<K: Introspect + Ord, V: Introspect>(
    pairs: Vec<(Value, Value)>,
) -> Result<Value, FixtureError> {
    downcast_pairs::<K, V>(pairs).map(|p| Value::new(p.into_iter().collect::<BTreeMap<K, V>>()))
}

fn sequence<T: Introspect>(
    kind: SequenceKind,
    len: Option<usize>,
    collect: fn(Vec<Value>) -> Result<Value, FixtureError>,
) -> Shape {
    Shape::Sequence(SequenceShape {
        element: TypeRef::of::<T>(),
        kind,
        len,
        collect,
    })
}

impl<T: Introspect> Introspect for Vec<T> {
    fn shape() -> Shape {
        sequence::<T>(SequenceKind::List, None, collect_vec::<T>)
    }
}

impl<T: Introspect> Introspect for VecDeque<T> {
    fn shape() -> Shape {
        sequence::<T>(SequenceKind::Deque, None, collect_deque::<T>)
    }
}

impl<T: Introspect> Introspect for Box<[T]> {
    fn shape() -> Shape {
        sequence::<T>(SequenceKind::Array, None, collect_boxed_slice::<T>)
    }
}

impl<T: Introspect, const N: usize> Introspect for [T; N] {
    fn shape() -> Shape {
        sequence::<T>(SequenceKind::Array, Some(N), collect_array::<T, N>)
    }
}

impl<T: Introspect + Eq + Hash> Introspect for HashSet<T> {
    fn shape() -> Shape {
        sequence::<T>(SequenceKind::Set, None, collect_hash_set::<T>)
    }
}

impl<T: Introspect + Ord> Introspect for BTreeSet<T> {
    fn shape() -> Shape {
        sequence::<T>(SequenceKind::Set, None, collect_btree_set::<T>)
    }
}

impl<K: Introspect + Eq + Hash, V: Introspect> Introspect for HashMap<K, V> {
    fn shape() -> Shape {
        Shape::Map(MapShape {
            key: TypeRef::of::<K>(),
            value: TypeRef::of::<V>(),
            collect: collect_hash_map::<K, V>,
        })
    }
}

impl<K: Introspect + Ord, V: Introspect> Introspect for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Map(MapShape {
            key: TypeRef::of::<K>(),
            value: TypeRef::of::<V>(),
            collect: collect_btree_map::<K, V>,
        })
    }
}

impl<A: Introspect, B: Introspect> Introspect for (A, B) {
    fn shape() -> Shape {
        ObjectShape::builder::<Self>()
            .constructor("tuple", vec![param::<A>("item1"), param::<B>("item2")], |args| {
                Ok((args.take()?, args.take()?))
            })
            .build()
    }
}

impl<A: Introspect, B: Introspect, C: Introspect> Introspect for (A, B, C) {
    fn shape() -> Shape {
        ObjectShape::builder::<Self>()
            .constructor(
                "tuple",
                vec![param::<A>("item1"), param::<B>("item2"), param::<C>("item3")],
                |args| Ok((args.take()?, args.take()?, args.take()?)),
            )
            .build()
    }
}
