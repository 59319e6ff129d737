//! Billing Domain - Recurring Contract Invoicing
//!
//! This crate computes recurring invoices from a set of service contracts.
//! Each contract item recurs on a yearly, monthly or daily cadence; an invoice
//! run counts the periods elapsed since the item was last invoiced, bills them
//! as one aggregated line and advances the item's last-invoiced date.
//!
//! # Layers
//!
//! - **Recurrence engine** (`recurrence`): period counting for one item
//! - **Contract aggregator** (`invoice`): bills the items of one contract and
//!   drops what is not due
//! - **Batch orchestrator** (`batch`): bills a deep copy of the whole set and
//!   writes only the last-invoiced dates back
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{Contract, ContractSet, Item};
//! use core_kernel::Cadence;
//!
//! let contract = Contract::new("ORDER1", "FAKTURA")
//!     .with_cadence(Cadence::monthly(1))
//!     .with_item(Item::new("Web hosting", "HOST", 101.0));
//!
//! let mut set = ContractSet::new(vec![contract])?;
//! let run = set.invoice(reference_date)?;
//! ```

pub mod contract;
pub mod recurrence;
pub mod invoice;
pub mod batch;
pub mod error;

pub use contract::{Contract, ContractDefaults, Item};
pub use recurrence::{invoice_item, ItemOutcome};
pub use invoice::{invoice_contract, BilledContract, BilledItem};
pub use batch::{ContractSet, InvoiceRun};
pub use error::{BillingError, Location};
