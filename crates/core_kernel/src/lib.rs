//! Core Kernel - Foundational value types for recurring invoicing
//!
//! This crate provides the building blocks shared by the billing domain and
//! the command line interface:
//! - Cadences (yearly, monthly or daily recurrence) and their textual codec
//! - Validity intervals with independently optional bounds
//! - Date codecs and calendar arithmetic
//! - Reference codes for orders, document types and price lists

pub mod temporal;
pub mod identifiers;
pub mod error;

pub use temporal::{Cadence, DateRange, ValidityInterval};
pub use identifiers::{DocumentType, OrderRef, PriceListRef};
pub use error::CoreError;
