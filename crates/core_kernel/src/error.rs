//! Core error types used across the system

use thiserror::Error;

/// Core error type for the kernel
///
/// `Format` means a raw value could not be parsed at all, `Validation` means
/// it parsed but describes something inconsistent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Format error: cannot read {value:?} as {expected}")]
    Format {
        value: String,
        expected: &'static str,
    },

    #[error("Validation error: {value:?} {reason}")]
    Validation {
        value: String,
        reason: String,
    },
}

impl CoreError {
    pub fn format(value: impl Into<String>, expected: &'static str) -> Self {
        CoreError::Format {
            value: value.into(),
            expected,
        }
    }

    pub fn validation(value: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::Validation {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// The raw value that caused the error
    pub fn value(&self) -> &str {
        match self {
            CoreError::Format { value, .. } | CoreError::Validation { value, .. } => value,
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, CoreError::Format { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation { .. })
    }
}
