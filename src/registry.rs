// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::any::{Any, TypeId};
use core::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::trace;
use spin::Once;

use crate::builder::{Builder, CompiledComparator, Invocation};
use crate::reflect::TypeInfo;


/// Registry entry for one type: its comparator, or the promise of one while
/// it is still being built.
pub struct ComparatorSlot {
    info: TypeInfo,
    compiled: Once<CompiledComparator>,
}

impl ComparatorSlot {
    fn new(info: TypeInfo) -> Self {
        Self {
            info,
            compiled: Once::new(),
        }
    }

    pub fn type_info(&self) -> TypeInfo {
        self.info
    }

    /// True once the comparator has been fully built.
    pub fn is_built(&self) -> bool {
        self.compiled.is_completed()
    }

    /// Blocks until the builder that owns this slot has finished.
    pub(crate) fn compiled(&self) -> &CompiledComparator {
        self.compiled.wait()
    }

    /// Null guard, then the compiled comparison. Both absent are equal, exactly
    /// one absent is a mismatch.
    pub(crate) fn compare(
        &self,
        a: Option<&dyn Any>,
        b: Option<&dyn Any>,
        cx: &mut Invocation,
    ) -> bool {
        let (a, b) = match (a, b) {
            (None, None) => return true,
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };

        let id = self.info.id();
        if !cx.enter(a, b, id) {
            trace!("{}: cycle detected, assuming equal", self.info.name());
            return true;
        }
        let result = self.compiled().compare(a, b, cx);
        cx.leave(a, b, id);
        result
    }
}

impl fmt::Debug for ComparatorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparatorSlot")
            .field("type", &self.info.name())
            .field("built", &self.is_built())
            .finish()
    }
}

/// Thread-safe, append-only cache of compiled comparators keyed by type.
///
/// At most one comparator exists per type for the life of the registry. The
/// first caller to ask for a type builds it; recursive requests made while
/// that build is running receive the same, still initializing, slot. Other
/// threads asking for the type meanwhile wait on the slot when they invoke it.
pub struct Registry {
    inner: DashMap<TypeId, Arc<ComparatorSlot>>,
    name: String,
}

impl Registry {
    /// Create a new, empty registry with a given name.
    pub fn new(registry_name: impl Into<String>) -> Self {
        Self {
            inner: DashMap::new(),
            name: registry_name.into(),
        }
    }

    /// Get the name of this registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the slot for `info`, building its comparator if no one has yet.
    pub fn slot(&self, info: &TypeInfo) -> Arc<ComparatorSlot> {
        let (slot, fresh) = match self.inner.entry(info.id()) {
            Entry::Occupied(e) => (Arc::clone(e.get()), false),
            Entry::Vacant(e) => {
                let slot = Arc::new(ComparatorSlot::new(*info));
                e.insert(Arc::clone(&slot));
                (slot, true)
            }
        };

        // The shard lock is released here; building recurses into the registry.
        if fresh {
            slot.compiled.call_once(|| Builder::new(self).build(info));
        }
        slot
    }

    /// Retrieve a slot by type, if it exists.
    pub fn get(&self, id: &TypeId) -> Option<Arc<ComparatorSlot>> {
        self.inner.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Check if a comparator for the given type exists.
    pub fn contains(&self, id: &TypeId) -> bool {
        self.inner.contains_key(id)
    }

    pub fn contains_type<T: Any>(&self) -> bool {
        self.contains(&TypeId::of::<T>())
    }

    /// List the names of all types with a comparator.
    pub fn list_names(&self) -> Vec<&'static str> {
        self.inner
            .iter()
            .map(|entry| entry.value().info.name())
            .collect()
    }

    /// Get the number of cached comparators.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("len", &self.len())
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new("COMPARATOR_REGISTRY")
    }
}
