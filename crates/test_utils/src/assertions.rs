//! Custom Test Assertions
//!
//! Provides assertion helpers for contract sets and invoice runs that give
//! more meaningful messages than standard assertions.

use chrono::NaiveDate;
use domain_billing::{BilledItem, ContractSet, InvoiceRun};

/// Asserts that a billed line covers `periods` periods from `start` to `end`
pub fn assert_billed_span(item: &BilledItem, periods: u32, start: NaiveDate, end: NaiveDate) {
    assert_eq!(
        item.periods, periods,
        "Item '{}' billed {} periods, expected {}",
        item.name, item.periods, periods
    );
    assert_eq!(
        (item.coverage.start, item.coverage.end),
        (start, end),
        "Item '{}' covers {}, expected {} - {}",
        item.name,
        item.coverage,
        start,
        end
    );
    assert_eq!(item.last_invoiced, end, "Item '{}' last invoiced date", item.name);
}

/// Asserts that `after` equals `before` except for last-invoiced dates
///
/// # Panics
///
/// Panics if any contract or item field other than `last_invoiced` differs,
/// or if a last-invoiced date moved backwards.
pub fn assert_only_last_invoiced_changed(before: &ContractSet, after: &ContractSet) {
    assert_eq!(before.len(), after.len(), "Contract count changed");

    for (old, new) in before.contracts().iter().zip(after.contracts()) {
        assert_eq!(old.items.len(), new.items.len(), "Item count changed in '{}'", old.name());

        let mut expected = new.clone();
        for (item, old_item) in expected.items.iter_mut().zip(&old.items) {
            if let (Some(previous), Some(current)) = (old_item.last_invoiced, item.last_invoiced) {
                assert!(
                    current >= previous,
                    "Last invoiced date of '{}' moved back from {} to {}",
                    item.name,
                    previous,
                    current
                );
            }
            item.last_invoiced = old_item.last_invoiced;
        }
        assert_eq!(&expected, old, "Contract '{}' changed beyond last invoiced dates", old.name());
    }
}

/// Asserts that every billed line number runs 1..=n within its invoice
pub fn assert_line_numbers_sequential(run: &InvoiceRun) {
    for invoice in &run.invoices {
        let numbers: Vec<usize> = invoice.items.iter().map(|item| item.line_number).collect();
        let expected: Vec<usize> = (1..=invoice.items.len()).collect();
        assert_eq!(numbers, expected, "Line numbers of '{}'", invoice.name());
    }
}
