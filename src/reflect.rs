// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/*
Rust offers no runtime reflection, so comparable types describe themselves
through the Reflect trait. A TypeInfo pairs the TypeId and name of a type with
its Shape. Shapes carry plain fn pointers monomorphized for the concrete type:
equality functions for leaf values, projections that step through Option and
smart pointers, a view that exposes sequences element by element, and for
object (class) types the function that lists their properties.

Everything operates on &dyn Any so that a compiled comparator can be stored in
a type-erased registry and still reach into nested values. The downcasts can
only fail if a TypeInfo is paired with a value of a different type, which the
registry never does.
*/

use core::any::{type_name, Any, TypeId};
use core::fmt;
use core::marker::PhantomData;
use std::cell::OnceCell;
use std::collections::{BTreeSet, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, OnceLock};

use crate::inspector::Property;

/// Compares two type-erased values of the same concrete type.
pub type EqFn = fn(&dyn Any, &dyn Any) -> bool;

/// Steps from a wrapper (`Option`, `Box`, ...) to the value it holds.
/// `None` means the wrapper holds nothing.
pub type Projection = fn(&dyn Any) -> Option<&dyn Any>;

/// Exposes a collection as an ordered [`Sequence`].
pub type SequenceView = fn(&dyn Any) -> Option<&dyn Sequence>;

/// Lists the comparable properties of an object type, in declaration order.
pub type PropertyList = fn() -> Vec<Property>;

/// A type whose instances can be compared structurally.
///
/// Implemented here for primitives, strings, standard collections, `Option` and
/// smart pointers. User object types implement it with [`reflect!`](crate::reflect),
/// enums and other natively comparable leaves with
/// [`directly_comparable!`](crate::directly_comparable), struct-like value types with
/// [`value_type!`](crate::value_type).
pub trait Reflect: Any {
    fn type_info() -> TypeInfo;
}

/// How a type participates in structural comparison.
#[derive(Clone, Copy)]
pub enum Shape {
    /// Compared with the type's own `==`.
    Scalar { eq: EqFn },
    /// User value type; compared as a whole through its boxed equality.
    Value { eq: EqFn },
    /// `Option<T>`, `OnceLock<T>`, `OnceCell<T>`.
    Nullable {
        inner: fn() -> TypeInfo,
        project: Projection,
    },
    /// `Box<T>`, `Rc<T>`, `Arc<T>`.
    Pointer {
        inner: fn() -> TypeInfo,
        project: Projection,
    },
    /// Ordered collection of `element`.
    Sequence {
        element: fn() -> TypeInfo,
        view: SequenceView,
    },
    /// Object type compared property by property.
    Class { properties: PropertyList },
    /// Anything else; compared by raw value.
    Opaque { eq: EqFn },
}

/// Runtime identity and shape of a [`Reflect`] type.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    shape: Shape,
}

impl TypeInfo {
    fn new<T: Any>(shape: Shape) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            shape,
        }
    }

    /// Natively comparable leaf type.
    pub fn scalar<T: Any + PartialEq>() -> Self {
        Self::new::<T>(Shape::Scalar {
            eq: native_eq::<T>,
        })
    }

    /// User-defined value type.
    pub fn value<T: Any + PartialEq>() -> Self {
        Self::new::<T>(Shape::Value {
            eq: native_eq::<T>,
        })
    }

    /// Raw value without a dedicated strategy.
    pub fn opaque<T: Any + PartialEq>() -> Self {
        Self::new::<T>(Shape::Opaque {
            eq: native_eq::<T>,
        })
    }

    /// Object type with the given property list.
    pub fn class<T: Any>(properties: PropertyList) -> Self {
        Self::new::<T>(Shape::Class { properties })
    }

    /// Ordered collection `S` of `E`.
    pub fn sequence<S: Sequence + Any, E: Reflect>() -> Self {
        Self::new::<S>(Shape::Sequence {
            element: E::type_info,
            view: view_sequence::<S>,
        })
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// True when the type is compared property by property.
    pub fn is_class(&self) -> bool {
        matches!(self.shape, Shape::Class { .. })
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo").field("name", &self.name).finish()
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

/// An ordered collection compared element by element.
pub trait Sequence {
    fn count(&self) -> usize;
    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Any> + '_>;
}

fn native_eq<T: Any + PartialEq>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn view_sequence<S: Sequence + Any>(value: &dyn Any) -> Option<&dyn Sequence> {
    value.downcast_ref::<S>().map(|s| s as &dyn Sequence)
}

fn project_option<T: Any>(value: &dyn Any) -> Option<&dyn Any> {
    value
        .downcast_ref::<Option<T>>()
        .and_then(Option::as_ref)
        .map(|v| v as &dyn Any)
}

fn project_once_lock<T: Any>(value: &dyn Any) -> Option<&dyn Any> {
    value
        .downcast_ref::<OnceLock<T>>()
        .and_then(OnceLock::get)
        .map(|v| v as &dyn Any)
}

fn project_once_cell<T: Any>(value: &dyn Any) -> Option<&dyn Any> {
    value
        .downcast_ref::<OnceCell<T>>()
        .and_then(OnceCell::get)
        .map(|v| v as &dyn Any)
}

fn project_pointer<P, T>(value: &dyn Any) -> Option<&dyn Any>
where
    P: core::ops::Deref<Target = T> + Any,
    T: Any,
{
    value.downcast_ref::<P>().map(|p| &**p as &dyn Any)
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(Shape::Nullable {
            inner: T::type_info,
            project: project_option::<T>,
        })
    }
}

// A cell that is set at most once reads like an Option; it is also the way to
// tie the knot in a cyclic graph.
impl<T: Reflect> Reflect for OnceLock<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(Shape::Nullable {
            inner: T::type_info,
            project: project_once_lock::<T>,
        })
    }
}

impl<T: Reflect> Reflect for OnceCell<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Self>(Shape::Nullable {
            inner: T::type_info,
            project: project_once_cell::<T>,
        })
    }
}

macro_rules! impl_pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: Reflect> Reflect for $ptr<T> {
                fn type_info() -> TypeInfo {
                    TypeInfo::new::<Self>(Shape::Pointer {
                        inner: T::type_info,
                        project: project_pointer::<$ptr<T>, T>,
                    })
                }
            }
        )*
    };
}

impl_pointer!(Box, Rc, Arc);

impl<T: Reflect> Sequence for Vec<T> {
    fn count(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Any> + '_> {
        Box::new(self.iter().map(|e| e as &dyn Any))
    }
}

impl<T: Reflect> Sequence for VecDeque<T> {
    fn count(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Any> + '_> {
        Box::new(self.iter().map(|e| e as &dyn Any))
    }
}

impl<T: Reflect> Sequence for Box<[T]> {
    fn count(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Any> + '_> {
        Box::new(self.iter().map(|e| e as &dyn Any))
    }
}

impl<T: Reflect, const N: usize> Sequence for [T; N] {
    fn count(&self) -> usize {
        N
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Any> + '_> {
        Box::new(self.iter().map(|e| e as &dyn Any))
    }
}

// Iteration order of a BTreeSet is its sort order, so positional comparison is stable.
impl<T: Reflect> Sequence for BTreeSet<T> {
    fn count(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Any> + '_> {
        Box::new(self.iter().map(|e| e as &dyn Any))
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence::<Self, T>()
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence::<Self, T>()
    }
}

impl<T: Reflect> Reflect for Box<[T]> {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence::<Self, T>()
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence::<Self, T>()
    }
}

impl<T: Reflect> Reflect for BTreeSet<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence::<Self, T>()
    }
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::scalar::<Self>()
                }
            }
        )*
    };
}

impl_scalar!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
    Box<str>,
    Rc<str>,
    Arc<str>,
    core::time::Duration,
    std::time::SystemTime,
);

#[cfg(feature = "time")]
impl_scalar!(
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::TimeDelta,
    chrono::DateTime<chrono::Utc>,
    chrono::DateTime<chrono::FixedOffset>,
    chrono::DateTime<chrono::Local>,
);

#[cfg(feature = "bigint")]
impl_scalar!(num_bigint::BigInt, num_bigint::BigUint);

impl Reflect for () {
    fn type_info() -> TypeInfo {
        TypeInfo::opaque::<Self>()
    }
}

impl<T: 'static> Reflect for PhantomData<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::opaque::<Self>()
    }
}

impl Reflect for TypeId {
    fn type_info() -> TypeInfo {
        TypeInfo::opaque::<Self>()
    }
}

/// Any [`Reflect`] value seen through a trait object, so that operands of
/// different types can reach the same entry point.
pub trait Object: Any {
    fn runtime_type(&self) -> TypeInfo;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Reflect> Object for T {
    fn runtime_type(&self) -> TypeInfo {
        T::type_info()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
