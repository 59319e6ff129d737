//! Invoice runs over a whole contract set
//!
//! The set is billed on a deep copy. Only the new last-invoiced dates are
//! written back into the set, and only once every contract billed cleanly.

use chrono::NaiveDate;
use tracing::info;

use crate::contract::Contract;
use crate::error::BillingError;
use crate::invoice::{invoice_contract, BilledContract};

/// The persisted contracts of one contract file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractSet {
    contracts: Vec<Contract>,
}

impl ContractSet {
    /// Creates a set after validating every contract
    pub fn new(contracts: Vec<Contract>) -> Result<Self, BillingError> {
        contracts.iter().try_for_each(Contract::validate)?;
        Ok(Self { contracts })
    }

    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Bills the set as of `reference_date`
    ///
    /// Returns the billed snapshot. On success each billed item's new
    /// last-invoiced date is recorded in `self`; nothing else in `self`
    /// changes.
    ///
    /// # Errors
    ///
    /// The first failing contract aborts the run and `self` is left as it was.
    pub fn invoice(&mut self, reference_date: NaiveDate) -> Result<InvoiceRun, BillingError> {
        let snapshot = self.contracts.clone();

        let mut invoices = Vec::new();
        for (source_index, contract) in snapshot.into_iter().enumerate() {
            if let Some(billed) = invoice_contract(contract, reference_date)? {
                invoices.push(BilledContract {
                    source_index,
                    ..billed
                });
            }
        }

        self.record_last_invoiced(&invoices);

        let run = InvoiceRun {
            reference_date,
            invoices,
        };
        info!(
            reference_date = %reference_date,
            contracts = self.contracts.len(),
            invoices = run.invoices.len(),
            lines = run.line_count(),
            "Invoice run complete"
        );
        Ok(run)
    }

    fn record_last_invoiced(&mut self, invoices: &[BilledContract]) {
        for billed in invoices {
            let Some(contract) = self.contracts.get_mut(billed.source_index) else {
                continue;
            };
            for line in &billed.items {
                if let Some(item) = contract.items.get_mut(line.source_index) {
                    item.last_invoiced = Some(line.last_invoiced);
                }
            }
        }
    }
}

/// The billed snapshot of one invoice run
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRun {
    pub reference_date: NaiveDate,
    /// One invoice per contract that had something due, in set order
    pub invoices: Vec<BilledContract>,
}

impl InvoiceRun {
    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    /// Number of invoice lines across all invoices
    pub fn line_count(&self) -> usize {
        self.invoices.iter().map(|invoice| invoice.items.len()).sum()
    }

    /// Sum of all invoice totals
    pub fn total(&self) -> f64 {
        self.invoices.iter().map(BilledContract::total).sum()
    }
}
