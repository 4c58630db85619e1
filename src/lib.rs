// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod builder;
mod comparer;
mod config;
mod error;
mod inspector;
mod macros;
mod reflect;
mod registry;
mod strategy;

pub use comparer::{are_equal, Comparator, Comparer, DeepEq};
pub use config::{
    fallback_compare_config, set_fallback_compare_config, CompareConfig, ElementComparison,
};
pub use error::CompareError;
pub use inspector::{list_properties, Property, PropertyDescriptor, TypeDescriptor};
pub use reflect::{Object, Reflect, Sequence, Shape, TypeInfo};
pub use registry::{ComparatorSlot, Registry};
pub use strategy::{classify, PropertyCategory};

/// Items in `unstable` are likely to change.
pub mod unstable {
    pub use crate::inspector::Accessor;
    pub use crate::reflect::{EqFn, Projection, PropertyList, SequenceView};
}
