//! Billing domain errors

use core_kernel::CoreError;
use std::fmt;
use thiserror::Error;

/// Identifies the contract, and optionally the item, an error refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub contract: String,
    pub item: Option<String>,
}

impl Location {
    pub fn contract(contract: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            item: None,
        }
    }

    pub fn item(contract: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            item: Some(item.into()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contract '{}'", self.contract)?;
        if let Some(item) = &self.item {
            write!(f, ", item '{}'", item)?;
        }
        Ok(())
    }
}

/// Errors that can occur in the billing domain
///
/// Either kind aborts the whole invoice run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BillingError {
    /// A raw value could not be parsed
    #[error("Format error in {location}: {message} (value {value:?})")]
    Format {
        location: Location,
        value: String,
        message: String,
    },

    /// A value parsed but is inconsistent
    #[error("Validation error in {location}: {message} (value {value:?})")]
    Validation {
        location: Location,
        value: String,
        message: String,
    },
}

impl BillingError {
    /// Attaches a location to a kernel error, keeping its kind
    pub fn at(location: Location, error: CoreError) -> Self {
        match error {
            CoreError::Format { value, expected } => BillingError::Format {
                location,
                value,
                message: format!("cannot read as {}", expected),
            },
            CoreError::Validation { value, reason } => BillingError::Validation {
                location,
                value,
                message: reason,
            },
        }
    }

    pub fn validation(
        location: Location,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        BillingError::Validation {
            location,
            value: value.into(),
            message: message.into(),
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            BillingError::Format { location, .. } | BillingError::Validation { location, .. } => {
                location
            }
        }
    }

    /// The offending raw value
    pub fn value(&self) -> &str {
        match self {
            BillingError::Format { value, .. } | BillingError::Validation { value, .. } => value,
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, BillingError::Format { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, BillingError::Validation { .. })
    }
}
