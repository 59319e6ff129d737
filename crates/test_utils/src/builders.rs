//! Test Data Builders
//!
//! Provides builder patterns for constructing contract sets with sensible
//! defaults. Tests specify only the fields they care about.

use chrono::NaiveDate;
use core_kernel::{Cadence, ValidityInterval};
use domain_billing::{Contract, ContractSet, Item};

use crate::fixtures::DateFixtures;

/// Builder for a single test item
pub struct TestItemBuilder {
    name: String,
    quantity: f64,
    cadence: Cadence,
    validity: Option<ValidityInterval>,
    last_invoiced: Option<NaiveDate>,
}

impl TestItemBuilder {
    /// Creates a monthly item priced 100, invoiced up to the standard fixture date
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 1.0,
            cadence: Cadence::monthly(1),
            validity: None,
            last_invoiced: Some(DateFixtures::last_invoiced()),
        }
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = cadence;
        self
    }

    /// Makes the item take the contract cadence
    pub fn inherit_cadence(mut self) -> Self {
        self.cadence = Cadence::INHERIT;
        self
    }

    pub fn validity(mut self, validity: ValidityInterval) -> Self {
        self.validity = Some(validity);
        self
    }

    pub fn last_invoiced(mut self, date: NaiveDate) -> Self {
        self.last_invoiced = Some(date);
        self
    }

    pub fn build(self) -> Item {
        Item {
            name: self.name,
            price_list: "CEN".into(),
            quantity: self.quantity,
            unit_price: 100.0,
            discount: 0.0,
            validity: self.validity,
            cadence: self.cadence,
            last_invoiced: self.last_invoiced,
        }
    }
}

/// Builder for a contract set
#[derive(Default)]
pub struct ContractSetBuilder {
    contracts: Vec<Contract>,
}

impl ContractSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a monthly contract with the given items
    pub fn contract(mut self, order_ref: &str, items: Vec<Item>) -> Self {
        let contract = items.into_iter().fold(
            Contract::new(order_ref, "FAKTURA")
                .with_description(format!("Contract {}", order_ref))
                .with_cadence(Cadence::monthly(1)),
            Contract::with_item,
        );
        self.contracts.push(contract);
        self
    }

    /// Adds a prepared contract
    pub fn with_contract(mut self, contract: Contract) -> Self {
        self.contracts.push(contract);
        self
    }

    pub fn build(self) -> ContractSet {
        ContractSet::new(self.contracts).expect("test contracts must be valid")
    }
}
