//! Billed contracts and items
//!
//! This module holds the billed snapshot produced by an invoice run, and the
//! aggregator that turns one contract into at most one invoice.

use chrono::NaiveDate;
use tracing::{debug, info};

use core_kernel::{Cadence, DateRange, DocumentType, OrderRef, PriceListRef, ValidityInterval};

use crate::contract::Contract;
use crate::error::{BillingError, Location};
use crate::recurrence::{invoice_item, ItemOutcome};

/// An invoice line covering one or more elapsed periods of an item
#[derive(Debug, Clone, PartialEq)]
pub struct BilledItem {
    /// 1-based position on the invoice, assigned by [`invoice_contract`]
    pub line_number: usize,
    /// Position of the item in its contract, assigned by [`invoice_contract`]
    pub source_index: usize,
    /// Item name as written in the contract
    pub name: String,
    /// Name annotated with the period count and coverage
    pub description: String,
    pub price_list: PriceListRef,
    /// Quantity per period multiplied by the number of periods
    pub quantity: f64,
    pub unit_price: f64,
    pub discount: f64,
    /// Number of elapsed periods billed
    pub periods: u32,
    /// Days covered by this line
    pub coverage: DateRange,
    /// Cadence after inheritance
    pub cadence: Cadence,
    /// Validity after inheritance
    pub validity: ValidityInterval,
    /// New last-invoiced date, the last day of `coverage`
    pub last_invoiced: NaiveDate,
}

impl BilledItem {
    /// Price-list reference in `code:` form
    pub fn price_list_code(&self) -> String {
        self.price_list.as_code()
    }

    /// Quantity times unit price, before discounts
    pub fn total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// An invoice issued for one contract
#[derive(Debug, Clone, PartialEq)]
pub struct BilledContract {
    /// Position of the contract in its set, assigned by the batch run
    pub source_index: usize,
    pub order_ref: OrderRef,
    pub document_type: DocumentType,
    pub description: String,
    /// Date the invoice is issued
    pub issue_date: NaiveDate,
    /// Date of the taxable supply
    pub tax_point_date: NaiveDate,
    pub discount: Option<f64>,
    /// Billed lines, never empty
    pub items: Vec<BilledItem>,
}

impl BilledContract {
    /// Contract name, the bare order reference
    pub fn name(&self) -> &str {
        self.order_ref.as_str()
    }

    /// Order reference in `code:` form
    pub fn order_code(&self) -> String {
        self.order_ref.as_code()
    }

    /// Document type in `code:` form
    pub fn document_type_code(&self) -> String {
        self.document_type.as_code()
    }

    /// Sum of line totals
    pub fn total(&self) -> f64 {
        self.items.iter().map(BilledItem::total).sum()
    }
}

/// Bills every item of `contract` as of `reference_date`
///
/// Items with no elapsed period are left out; the remaining ones keep their
/// relative order and are numbered from 1. Returns `None` when nothing was
/// due.
///
/// # Errors
///
/// The first item that fails aborts the contract; the error names the
/// contract and the item.
pub fn invoice_contract(
    contract: Contract,
    reference_date: NaiveDate,
) -> Result<Option<BilledContract>, BillingError> {
    let defaults = contract.defaults();
    let name = contract.name().to_string();

    let outcomes = contract
        .items
        .into_iter()
        .map(|item| {
            let location = Location::item(name.as_str(), item.name.as_str());
            invoice_item(item, &defaults, reference_date).map_err(|e| BillingError::at(location, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let items: Vec<BilledItem> = outcomes
        .into_iter()
        .enumerate()
        .filter_map(|(source_index, outcome)| match outcome {
            ItemOutcome::Billed(billed) => Some(BilledItem {
                source_index,
                ..billed
            }),
            ItemOutcome::NotDue(item) => {
                debug!(contract = %name, item = %item.name, "Item not due");
                None
            }
        })
        .enumerate()
        .map(|(position, billed)| BilledItem {
            line_number: position + 1,
            ..billed
        })
        .collect();

    if items.is_empty() {
        info!(contract = %name, "Skipping contract with nothing due");
        return Ok(None);
    }

    Ok(Some(BilledContract {
        source_index: 0,
        order_ref: contract.order_ref,
        document_type: contract.document_type,
        description: contract.description,
        issue_date: reference_date,
        tax_point_date: reference_date,
        discount: contract.discount,
        items,
    }))
}
