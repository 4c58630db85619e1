// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::any::Any;
use core::fmt;
use core::marker::PhantomData;
use std::sync::Arc;

use log::debug;

use crate::builder::Invocation;
use crate::config::{fallback_compare_config, CompareConfig};
use crate::error::CompareError;
use crate::inspector::TypeDescriptor;
use crate::reflect::{Object, Reflect};
use crate::registry::{ComparatorSlot, Registry};
use crate::strategy::classify;

/// Structural equality entry point.
///
/// Owns a [`Registry`] of compiled comparators. Most callers use the
/// process-wide instance through [`Comparer::global`], [`are_equal`] or
/// [`DeepEq`]; separate instances keep separate caches.
pub struct Comparer {
    registry: Registry,
    config: Option<CompareConfig>,
}

lazy_static::lazy_static! {
    /// Global singleton comparer.
    static ref COMPARER: Comparer = Comparer::new();
}

impl Default for Comparer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Comparer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparer")
            .field("registry", &self.registry.name())
            .field("cached", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Comparer {
    pub fn new() -> Self {
        Self {
            registry: Registry::default(),
            config: None,
        }
    }

    pub fn with_config(config: CompareConfig) -> Self {
        Self {
            registry: Registry::default(),
            config: Some(config),
        }
    }

    /// The process-wide comparer.
    pub fn global() -> &'static Comparer {
        &COMPARER
    }

    /// Overrides the process-wide fallback configuration for this comparer.
    /// Passing `None` goes back to the fallback.
    pub fn set_config(&mut self, config: Option<CompareConfig>) {
        self.config = config;
    }

    /// The configuration comparisons run with right now.
    pub fn effective_config(&self) -> CompareConfig {
        self.config
            .or_else(fallback_compare_config)
            .unwrap_or_default()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Compares two operands that must share a runtime type.
    pub fn are_equal(&self, a: &dyn Object, b: &dyn Object) -> Result<bool, CompareError> {
        let (left, right) = (a.runtime_type(), b.runtime_type());
        if left != right {
            debug!(
                "refusing to compare {} with {}",
                left.name(),
                right.name()
            );
            return Err(CompareError::TypeMismatch {
                left: left.name(),
                right: right.name(),
            });
        }

        let slot = self.registry.slot(&left);
        let mut cx = Invocation::new(self.effective_config());
        Ok(slot.compare(Some(a.as_any()), Some(b.as_any()), &mut cx))
    }

    /// Like [`are_equal`](Self::are_equal), for operands that may be absent.
    /// The type of an absent operand is unknown, so absence is an error.
    pub fn are_equal_nullable(
        &self,
        a: Option<&dyn Object>,
        b: Option<&dyn Object>,
    ) -> Result<bool, CompareError> {
        match (a, b) {
            (Some(a), Some(b)) => self.are_equal(a, b),
            (None, _) => Err(CompareError::InvalidArgument(
                "left operand is absent; its type cannot be determined".to_string(),
            )),
            (_, None) => Err(CompareError::InvalidArgument(
                "right operand is absent; its type cannot be determined".to_string(),
            )),
        }
    }

    /// Typed comparison; the types agree by construction.
    pub fn deep_eq<T: Reflect>(&self, a: &T, b: &T) -> bool {
        self.comparator::<T>().compare(a, b)
    }

    /// The cached comparator for `T`, built on first use.
    pub fn comparator<T: Reflect>(&self) -> Comparator<'_, T> {
        Comparator {
            slot: self.registry.slot(&T::type_info()),
            comparer: self,
            _marker: PhantomData,
        }
    }

    /// Property order and categories the comparator for `T` uses.
    pub fn describe<T: Reflect>(&self) -> TypeDescriptor {
        let info = T::type_info();
        let slot = self.registry.slot(&info);
        let compiled = slot.compiled();
        TypeDescriptor {
            name: compiled.type_name(),
            category: classify(&info),
            properties: compiled.properties(),
        }
    }
}

/// Typed handle on the compiled comparator for `T`.
pub struct Comparator<'c, T> {
    slot: Arc<ComparatorSlot>,
    comparer: &'c Comparer,
    _marker: PhantomData<fn(&T, &T) -> bool>,
}

impl<T: Reflect> Comparator<'_, T> {
    pub fn compare(&self, a: &T, b: &T) -> bool {
        self.compare_nullable(Some(a), Some(b))
    }

    /// Both absent are equal; exactly one absent is not.
    pub fn compare_nullable(&self, a: Option<&T>, b: Option<&T>) -> bool {
        let mut cx = Invocation::new(self.comparer.effective_config());
        self.slot.compare(
            a.map(|a| a as &dyn Any),
            b.map(|b| b as &dyn Any),
            &mut cx,
        )
    }

    /// True when both handles refer to the same compiled comparator.
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<T> fmt::Debug for Comparator<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator")
            .field("type", &self.slot.type_info().name())
            .field("built", &self.slot.is_built())
            .finish()
    }
}

/// Compares two operands with the process-wide comparer.
pub fn are_equal(a: &dyn Object, b: &dyn Object) -> Result<bool, CompareError> {
    Comparer::global().are_equal(a, b)
}

/// Structural equality as a method on every [`Reflect`] value.
pub trait DeepEq {
    /// Compares with `other` using the process-wide comparer. Fails when
    /// `other` is of a different type.
    fn is_equal(&self, other: &dyn Object) -> Result<bool, CompareError>;
}

impl<T: Reflect> DeepEq for T {
    fn is_equal(&self, other: &dyn Object) -> Result<bool, CompareError> {
        Comparer::global().are_equal(self, other)
    }
}
