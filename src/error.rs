// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// Errors reported by the comparison entry points.
///
/// Values that differ are not errors; they compare as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    /// The operands do not share a runtime type.
    #[error("Operands are not of the same type: '{left}' and '{right}'")]
    TypeMismatch {
        left: &'static str,
        right: &'static str,
    },
    /// An operand is absent, so its runtime type cannot be determined.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Comparer configuration could not be parsed.
    #[error("Invalid comparer configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for CompareError {
    fn from(error: serde_json::Error) -> Self {
        CompareError::InvalidConfig(error.to_string())
    }
}
