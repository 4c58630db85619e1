// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::{Deserialize, Serialize};
use spin::Mutex;

use crate::error::CompareError;

/// How elements of a sequence are compared once the lengths agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementComparison {
    /// Every element pair goes through the same strategy selection as a property.
    #[default]
    Uniform,
    /// Only object elements are compared; other element types are just counted.
    ReferenceOnly,
}

/// Invocation-time options for structural comparison.
///
/// Compiled comparators never depend on these; the same cached comparator is
/// used under every configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CompareConfig {
    /// Track object pairs under comparison and treat a pair met again further
    /// down as equal. Without it, cyclic graphs recurse until the stack overflows.
    pub detect_cycles: bool,
    pub element_comparison: ElementComparison,
}

impl CompareConfig {
    /// Parses a configuration object. Every field is optional.
    pub fn from_json_str(json: &str) -> Result<Self, CompareError> {
        // Derived deserializers also accept the positional (array) form.
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(CompareError::InvalidConfig(format!(
                "expected a JSON object, found {json}"
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_str(&self) -> Result<String, CompareError> {
        Ok(serde_json::to_string(self)?)
    }
}

static FALLBACK_COMPARE_CONFIG: Mutex<Option<CompareConfig>> = Mutex::new(None);

/// Sets the process-wide fallback configuration. A [`Comparer`](crate::Comparer)
/// with its own configuration ignores the fallback.
pub fn set_fallback_compare_config(config: Option<CompareConfig>) {
    *FALLBACK_COMPARE_CONFIG.lock() = config;
}

/// Returns the process-wide fallback configuration, if any.
pub fn fallback_compare_config() -> Option<CompareConfig> {
    *FALLBACK_COMPARE_CONFIG.lock()
}
