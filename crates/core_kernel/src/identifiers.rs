//! Strongly-typed reference codes
//!
//! Orders, document types and price-list entries are referenced by short
//! codes defined in the accounting system. Newtype wrappers keep them from
//! being mixed up, and render the `code:` form the invoice import expects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix marking a value as a reference to an existing record by code
pub const CODE_PREFIX: &str = "code:";

macro_rules! define_code {
    ($name:ident) => {
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(code: impl Into<String>) -> Self {
                Self(code.into())
            }

            /// Returns the bare code
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the code in reference form, e.g. `code:HOSTING`
            pub fn as_code(&self) -> String {
                format!("{}{}", CODE_PREFIX, self.0)
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(code: &str) -> Self {
                Self(code.to_string())
            }
        }

        impl From<String> for $name {
            fn from(code: String) -> Self {
                Self(code)
            }
        }

        impl From<$name> for String {
            fn from(code: $name) -> String {
                code.0
            }
        }
    };
}

define_code!(OrderRef);
define_code!(DocumentType);
define_code!(PriceListRef);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_ref_display() {
        let order = OrderRef::new("TEST1");
        assert_eq!(order.to_string(), "TEST1");
        assert_eq!(order.as_str(), "TEST1");
    }

    #[test]
    fn test_as_code_adds_prefix() {
        assert_eq!(PriceListRef::from("CEN1A").as_code(), "code:CEN1A");
        assert_eq!(DocumentType::from("FAKTURA").as_code(), "code:FAKTURA");
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&OrderRef::new("TEST2")).unwrap();
        assert_eq!(json, "\"TEST2\"");

        let back: OrderRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderRef::new("TEST2"));
    }
}
