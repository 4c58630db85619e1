// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::any::Any;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::builder::Invocation;
use crate::config::ElementComparison;
use crate::reflect::{EqFn, Projection, SequenceView, Shape, TypeInfo};
use crate::registry::{ComparatorSlot, Registry};

/// How a property's type is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyCategory {
    /// Native `==`: primitives, enums, strings, date/time, big integers.
    DirectlyComparable,
    /// `Option` over a value, or a user value type.
    NullableOrOwnValueType,
    /// Ordered collection, possibly behind an `Option`.
    Sequence,
    /// Object type compared recursively through its own comparator.
    Reference,
    /// Raw value comparison.
    OpaqueValue,
}

/// Classifies a type. Wrappers take the category of what they wrap, except
/// that an `Option` over a leaf value is `NullableOrOwnValueType`.
pub fn classify(info: &TypeInfo) -> PropertyCategory {
    match info.shape() {
        Shape::Scalar { .. } => PropertyCategory::DirectlyComparable,
        Shape::Sequence { .. } => PropertyCategory::Sequence,
        Shape::Value { .. } => PropertyCategory::NullableOrOwnValueType,
        Shape::Nullable { inner, .. } => match classify(&inner()) {
            category @ (PropertyCategory::Sequence | PropertyCategory::Reference) => category,
            _ => PropertyCategory::NullableOrOwnValueType,
        },
        Shape::Pointer { inner, .. } => classify(&inner()),
        Shape::Class { .. } => PropertyCategory::Reference,
        Shape::Opaque { .. } => PropertyCategory::OpaqueValue,
    }
}

/// A compiled comparison rule for one value type.
pub(crate) enum Rule {
    Native(EqFn),
    Boxed(EqFn),
    Opaque(EqFn),
    /// Both absent match, exactly one absent is a mismatch.
    Nullable {
        project: Projection,
        inner: Box<Rule>,
    },
    Deref {
        project: Projection,
        inner: Box<Rule>,
    },
    Sequence {
        view: SequenceView,
        element: Box<Rule>,
        element_category: PropertyCategory,
    },
    Reference(Arc<ComparatorSlot>),
}

impl Rule {
    /// Selects the rule for values of `info`. Object types resolve through the
    /// registry, which may hand back a comparator that is still being built.
    pub(crate) fn select(info: &TypeInfo, registry: &Registry) -> Self {
        match *info.shape() {
            Shape::Scalar { eq } => Rule::Native(eq),
            Shape::Value { eq } => Rule::Boxed(eq),
            Shape::Opaque { eq } => Rule::Opaque(eq),
            Shape::Nullable { inner, project } => Rule::Nullable {
                project,
                inner: Box::new(Rule::select(&inner(), registry)),
            },
            Shape::Pointer { inner, project } => Rule::Deref {
                project,
                inner: Box::new(Rule::select(&inner(), registry)),
            },
            Shape::Sequence { element, view } => {
                let element = element();
                Rule::Sequence {
                    view,
                    element: Box::new(Rule::select(&element, registry)),
                    element_category: classify(&element),
                }
            }
            Shape::Class { .. } => Rule::Reference(registry.slot(info)),
        }
    }

    pub(crate) fn matches(&self, a: &dyn Any, b: &dyn Any, cx: &mut Invocation) -> bool {
        match self {
            Rule::Native(eq) | Rule::Boxed(eq) | Rule::Opaque(eq) => eq(a, b),
            Rule::Nullable { project, inner } => match (project(a), project(b)) {
                (None, None) => true,
                (Some(a), Some(b)) => inner.matches(a, b, cx),
                _ => false,
            },
            Rule::Deref { project, inner } => match (project(a), project(b)) {
                (Some(a), Some(b)) => inner.matches(a, b, cx),
                _ => false,
            },
            Rule::Sequence {
                view,
                element,
                element_category,
            } => {
                let (Some(a), Some(b)) = (view(a), view(b)) else {
                    return false;
                };
                if a.count() != b.count() {
                    return false;
                }
                if cx.config().element_comparison == ElementComparison::ReferenceOnly
                    && *element_category != PropertyCategory::Reference
                {
                    return true;
                }
                a.elements()
                    .zip(b.elements())
                    .all(|(a, b)| element.matches(a, b, cx))
            }
            Rule::Reference(slot) => slot.compare(Some(a), Some(b), cx),
        }
    }
}
