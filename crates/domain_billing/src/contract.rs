//! Service contracts and their billable items
//!
//! A contract groups items that share a default cadence and validity. Items
//! may override either; an all-zero cadence or an absent validity bound is
//! resolved from the contract when the item is billed.

use chrono::NaiveDate;

use core_kernel::{Cadence, DocumentType, OrderRef, PriceListRef, ValidityInterval};

use crate::error::{BillingError, Location};

/// One billable line within a contract
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Item name, also the base of the billed description
    pub name: String,
    /// Price-list entry the line refers to
    pub price_list: PriceListRef,
    /// Quantity per period; zero is billed as one
    pub quantity: f64,
    /// Unit price
    pub unit_price: f64,
    /// Line discount
    pub discount: f64,
    /// Validity override, absent bounds come from the contract
    pub validity: Option<ValidityInterval>,
    /// Cadence override, `Cadence::INHERIT` uses the contract cadence
    pub cadence: Cadence,
    /// Last day covered by a previous invoice, `None` for a new item
    pub last_invoiced: Option<NaiveDate>,
}

impl Item {
    /// Creates a new item with quantity one that inherits cadence and validity
    pub fn new(name: impl Into<String>, price_list: impl Into<PriceListRef>, unit_price: f64) -> Self {
        Self {
            name: name.into(),
            price_list: price_list.into(),
            quantity: 1.0,
            unit_price,
            discount: 0.0,
            validity: None,
            cadence: Cadence::INHERIT,
            last_invoiced: None,
        }
    }

    /// Sets the quantity
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Applies a discount
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    /// Overrides the contract validity
    pub fn with_validity(mut self, validity: ValidityInterval) -> Self {
        self.validity = Some(validity);
        self
    }

    /// Overrides the contract cadence
    pub fn with_cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = cadence;
        self
    }

    /// Marks the item as invoiced up to and including `date`
    pub fn with_last_invoiced(mut self, date: NaiveDate) -> Self {
        self.last_invoiced = Some(date);
        self
    }

    /// Quantity billed for a single period
    pub fn billable_quantity(&self) -> f64 {
        if self.quantity == 0.0 {
            1.0
        } else {
            self.quantity
        }
    }

    /// Checks the numeric invariants of the item
    pub fn validate(&self, contract: &str) -> Result<(), BillingError> {
        let location = || Location::item(contract, self.name.as_str());

        // Written negated so that NaN is rejected too
        if !(self.quantity >= 0.0) {
            return Err(BillingError::validation(
                location(),
                self.quantity.to_string(),
                "quantity must not be negative",
            ));
        }
        if !(self.discount >= 0.0) {
            return Err(BillingError::validation(
                location(),
                self.discount.to_string(),
                "discount must not be negative",
            ));
        }
        Ok(())
    }
}

/// Cadence and validity an item falls back to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractDefaults {
    pub cadence: Cadence,
    pub validity: ValidityInterval,
}

/// A billing agreement with a default cadence and validity
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    /// Order reference, also used as the contract name
    pub order_ref: OrderRef,
    /// Document type of the issued invoice
    pub document_type: DocumentType,
    /// Free-text description carried to the invoice
    pub description: String,
    /// Default validity for items
    pub validity: ValidityInterval,
    /// Default cadence for items
    pub cadence: Cadence,
    /// Document-level discount
    pub discount: Option<f64>,
    /// Items in billing order
    pub items: Vec<Item>,
}

impl Contract {
    /// Creates an empty contract
    pub fn new(order_ref: impl Into<OrderRef>, document_type: impl Into<DocumentType>) -> Self {
        Self {
            order_ref: order_ref.into(),
            document_type: document_type.into(),
            description: String::new(),
            validity: ValidityInterval::unbounded(),
            cadence: Cadence::INHERIT,
            discount: None,
            items: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_validity(mut self, validity: ValidityInterval) -> Self {
        self.validity = validity;
        self
    }

    pub fn with_cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = cadence;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Appends an item
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// The contract name shown on invoices and in reports
    pub fn name(&self) -> &str {
        self.order_ref.as_str()
    }

    /// Values items inherit when they do not override them
    pub fn defaults(&self) -> ContractDefaults {
        ContractDefaults {
            cadence: self.cadence,
            validity: self.validity,
        }
    }

    /// Checks the contract and all its items
    pub fn validate(&self) -> Result<(), BillingError> {
        if let Some(discount) = self.discount {
            if !(discount >= 0.0) {
                return Err(BillingError::validation(
                    Location::contract(self.name()),
                    discount.to_string(),
                    "discount must not be negative",
                ));
            }
        }
        self.items
            .iter()
            .try_for_each(|item| item.validate(self.name()))
    }
}
