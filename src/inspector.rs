// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::any::Any;
use core::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::reflect::{Reflect, Shape, TypeInfo};
use crate::strategy::{classify, PropertyCategory};

/// Reads a property from a type-erased owner.
pub type Accessor = Arc<dyn Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync>;

fn accessor<F>(read: F) -> Accessor
where
    F: Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync + 'static,
{
    Arc::new(read)
}

/// A publicly readable property of an object type.
#[derive(Clone)]
pub struct Property {
    name: &'static str,
    value_type: fn() -> TypeInfo,
    read: Accessor,
}

impl Property {
    /// Declares property `name` of owner `O`, read through `getter`.
    pub fn new<O, T, F>(name: &'static str, getter: F) -> Self
    where
        O: Any,
        T: Reflect,
        F: Fn(&O) -> &T + Send + Sync + 'static,
    {
        Self {
            name,
            value_type: T::type_info,
            read: accessor(move |owner| {
                owner
                    .downcast_ref::<O>()
                    .map(|owner| getter(owner) as &dyn Any)
            }),
        }
    }

    /// Properties of base type `B`, read from owner `O` through `base`.
    ///
    /// Object types have no inheritance; an embedded base struct plays that role
    /// and its properties are listed ahead of the owner's own. `B` must be an
    /// object type; any other base has no properties to contribute.
    pub fn inherited<O, B, F>(base: F) -> Vec<Self>
    where
        O: Any,
        B: Reflect,
        F: Fn(&O) -> &B + Send + Sync + 'static,
    {
        let info = B::type_info();
        debug_assert!(
            info.is_class(),
            "base type {} is not an object type",
            info.name()
        );
        let base = Arc::new(base);
        list_properties(&info)
            .into_iter()
            .map(|property| {
                let base = Arc::clone(&base);
                let read = property.read;
                Self {
                    name: property.name,
                    value_type: property.value_type,
                    read: accessor(move |owner| {
                        owner
                            .downcast_ref::<O>()
                            .map(|owner| base(owner) as &dyn Any)
                            .and_then(|base| read(base))
                    }),
                }
            })
            .collect()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value_type(&self) -> TypeInfo {
        (self.value_type)()
    }

    pub(crate) fn accessor(&self) -> &Accessor {
        &self.read
    }

    /// Reads this property from `owner`.
    pub fn read<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.read)(owner)
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value_type", &self.value_type().name())
            .finish()
    }
}

/// Lists every comparable property of `info`, base properties first, then the
/// type's own in declaration order. Non-object types have none.
pub fn list_properties(info: &TypeInfo) -> Vec<Property> {
    match info.shape() {
        Shape::Class { properties } => properties(),
        _ => Vec::new(),
    }
}

/// Serializable view of a type's comparable properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub name: &'static str,
    pub category: PropertyCategory,
    pub properties: Vec<PropertyDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub type_name: &'static str,
    pub category: PropertyCategory,
}

impl From<&Property> for PropertyDescriptor {
    fn from(property: &Property) -> Self {
        let info = property.value_type();
        Self {
            name: property.name,
            type_name: info.name(),
            category: classify(&info),
        }
    }
}

impl TypeDescriptor {
    pub fn of(info: &TypeInfo) -> Self {
        Self {
            name: info.name(),
            category: classify(info),
            properties: list_properties(info)
                .iter()
                .map(PropertyDescriptor::from)
                .collect(),
        }
    }
}
