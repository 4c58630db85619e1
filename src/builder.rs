// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::any::{Any, TypeId};
use std::collections::BTreeSet;

use log::{debug, trace};

use crate::config::CompareConfig;
use crate::inspector::{list_properties, Accessor, Property, PropertyDescriptor};
use crate::reflect::{Shape, TypeInfo};
use crate::registry::Registry;
use crate::strategy::{classify, Rule};

/// One property of a compiled comparator.
pub(crate) struct CompiledProperty {
    descriptor: PropertyDescriptor,
    read: Accessor,
    rule: Rule,
}

enum Body {
    /// Object type: every property, in inspector order.
    Properties(Vec<CompiledProperty>),
    /// Any other type: a single rule applied to the values themselves.
    Value(Rule),
}

/// The comparison routine for exactly one type.
pub(crate) struct CompiledComparator {
    type_name: &'static str,
    body: Body,
}

impl CompiledComparator {
    /// Compares two present values. Stops at the first mismatching property.
    pub(crate) fn compare(&self, a: &dyn Any, b: &dyn Any, cx: &mut Invocation) -> bool {
        match &self.body {
            Body::Value(rule) => rule.matches(a, b, cx),
            Body::Properties(properties) => properties.iter().all(|property| {
                let matched = match (property.read(a), property.read(b)) {
                    (Some(x), Some(y)) => property.rule.matches(x, y, cx),
                    _ => false,
                };
                if !matched {
                    trace!(
                        "{}: property '{}' does not match",
                        self.type_name,
                        property.descriptor.name
                    );
                }
                matched
            }),
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn properties(&self) -> Vec<PropertyDescriptor> {
        match &self.body {
            Body::Properties(properties) => {
                properties.iter().map(|p| p.descriptor.clone()).collect()
            }
            Body::Value(_) => Vec::new(),
        }
    }
}

impl CompiledProperty {
    fn read<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.read)(owner)
    }
}

/// Assembles compiled comparators, resolving nested object types through the registry.
pub(crate) struct Builder<'r> {
    registry: &'r Registry,
}

impl<'r> Builder<'r> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub(crate) fn build(&self, info: &TypeInfo) -> CompiledComparator {
        let body = match info.shape() {
            Shape::Class { .. } => Body::Properties(
                list_properties(info)
                    .iter()
                    .map(|property| self.compile_property(property))
                    .collect(),
            ),
            _ => Body::Value(Rule::select(info, self.registry)),
        };

        let count = match &body {
            Body::Properties(properties) => properties.len(),
            Body::Value(_) => 0,
        };
        debug!(
            "built comparator for {} ({:?}, {count} properties)",
            info.name(),
            classify(info)
        );

        CompiledComparator {
            type_name: info.name(),
            body,
        }
    }

    fn compile_property(&self, property: &Property) -> CompiledProperty {
        let value_type = property.value_type();
        CompiledProperty {
            descriptor: PropertyDescriptor::from(property),
            read: property.accessor().clone(),
            rule: Rule::select(&value_type, self.registry),
        }
    }
}

type PairKey = (usize, usize, TypeId);

/// Per-call state threaded through a comparison.
pub(crate) struct Invocation {
    config: CompareConfig,
    in_progress: Option<BTreeSet<PairKey>>,
}

impl Invocation {
    pub(crate) fn new(config: CompareConfig) -> Self {
        Self {
            in_progress: config.detect_cycles.then(BTreeSet::new),
            config,
        }
    }

    pub(crate) fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Marks the pair as being compared. Returns false when the pair is already
    /// in progress higher up the stack, i.e. the graphs loop back on themselves.
    pub(crate) fn enter(&mut self, a: &dyn Any, b: &dyn Any, id: TypeId) -> bool {
        match &mut self.in_progress {
            Some(pairs) => pairs.insert(pair_key(a, b, id)),
            None => true,
        }
    }

    pub(crate) fn leave(&mut self, a: &dyn Any, b: &dyn Any, id: TypeId) {
        if let Some(pairs) = &mut self.in_progress {
            pairs.remove(&pair_key(a, b, id));
        }
    }
}

fn pair_key(a: &dyn Any, b: &dyn Any, id: TypeId) -> PairKey {
    (
        a as *const dyn Any as *const () as usize,
        b as *const dyn Any as *const () as usize,
        id,
    )
}
