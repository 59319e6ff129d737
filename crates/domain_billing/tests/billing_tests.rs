//! Comprehensive tests for domain_billing

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use core_kernel::{Cadence, ValidityInterval};
use domain_billing::{
    invoice_contract, invoice_item, BillingError, Contract, ContractDefaults, ContractSet, Item,
    ItemOutcome,
};
use test_utils::{
    assert_billed_span, assert_line_numbers_sequential, assert_only_last_invoiced_changed,
    contract_set_strategy, item_strategy, ContractFixtures, ContractSetBuilder, DateFixtures,
    TestItemBuilder,
};

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    DateFixtures::ymd(year, month, day)
}

fn billed(outcome: ItemOutcome) -> domain_billing::BilledItem {
    match outcome {
        ItemOutcome::Billed(item) => item,
        ItemOutcome::NotDue(item) => panic!("Expected '{}' to be billed", item.name),
    }
}

// ============================================================================
// Recurrence Engine Tests
// ============================================================================

mod recurrence_tests {
    use super::*;

    #[test]
    fn test_one_month_elapsed_bills_december() {
        let item = ContractFixtures::monthly_item();
        let outcome = invoice_item(item, &ContractDefaults::default(), ymd(2016, 12, 15)).unwrap();

        assert_eq!(outcome.elapsed_periods(), 1);
        let line = billed(outcome);
        assert_billed_span(&line, 1, ymd(2016, 12, 1), ymd(2016, 12, 31));
        assert_eq!(line.quantity, 1.0);
        assert_eq!(line.unit_price, 101.0);
        assert_eq!(line.description, "Test 1a for 1 period (1.12.2016 – 31.12.2016)");
    }

    #[test]
    fn test_already_covered_item_is_not_due() {
        let item = ContractFixtures::covered_yearly_item();
        let outcome = invoice_item(item.clone(), &ContractDefaults::default(), ymd(2016, 1, 1)).unwrap();

        assert_eq!(outcome.elapsed_periods(), 0);
        assert_eq!(outcome, ItemOutcome::NotDue(item));
    }

    #[test]
    fn test_never_invoiced_item_bills_one_period() {
        let item = ContractFixtures::new_monthly_item();
        let line = billed(invoice_item(item, &ContractDefaults::default(), ymd(2016, 11, 30)).unwrap());

        // Initialised to 30.10.2016, so the window starts the day after
        assert_billed_span(&line, 1, ymd(2016, 10, 31), ymd(2016, 11, 30));
    }

    #[test]
    fn test_reference_on_period_start_bills_that_period() {
        let item = ContractFixtures::monthly_item();
        let line = billed(invoice_item(item, &ContractDefaults::default(), ymd(2016, 12, 1)).unwrap());

        assert_billed_span(&line, 1, ymd(2016, 12, 1), ymd(2016, 12, 31));
    }

    #[test]
    fn test_reference_on_last_invoiced_day_is_not_due() {
        let item = ContractFixtures::monthly_item();
        let outcome = invoice_item(item, &ContractDefaults::default(), ymd(2016, 11, 30)).unwrap();

        assert_eq!(outcome.elapsed_periods(), 0);
    }

    #[test]
    fn test_several_periods_aggregate_quantity() {
        let item = TestItemBuilder::new("Hosting")
            .quantity(2.0)
            .last_invoiced(ymd(2016, 9, 30))
            .build();
        let line = billed(invoice_item(item, &ContractDefaults::default(), ymd(2016, 12, 15)).unwrap());

        assert_billed_span(&line, 3, ymd(2016, 10, 1), ymd(2016, 12, 31));
        assert_eq!(line.quantity, 6.0);
        assert!(line.description.contains("3 periods"));
    }

    #[test]
    fn test_daily_cadence() {
        let item = TestItemBuilder::new("Parking")
            .cadence(Cadence::daily(7))
            .last_invoiced(ymd(2016, 12, 1))
            .build();
        let line = billed(invoice_item(item, &ContractDefaults::default(), ymd(2016, 12, 15)).unwrap());

        // Weeks start on 2.12, 9.12 and 16.12; only the first two have begun
        assert_billed_span(&line, 2, ymd(2016, 12, 2), ymd(2016, 12, 15));
    }

    #[test]
    fn test_item_inherits_contract_cadence() {
        let item = TestItemBuilder::new("Support")
            .inherit_cadence()
            .last_invoiced(ymd(2015, 12, 31))
            .build();
        let defaults = ContractDefaults {
            cadence: Cadence::yearly(1),
            ..Default::default()
        };
        let line = billed(invoice_item(item, &defaults, ymd(2016, 6, 1)).unwrap());

        assert_eq!(line.cadence, Cadence::yearly(1));
        assert_billed_span(&line, 1, ymd(2016, 1, 1), ymd(2016, 12, 31));
    }

    #[test]
    fn test_item_cadence_overrides_contract() {
        let item = ContractFixtures::monthly_item();
        let defaults = ContractDefaults {
            cadence: Cadence::yearly(1),
            ..Default::default()
        };
        let line = billed(invoice_item(item, &defaults, ymd(2016, 12, 15)).unwrap());

        assert_eq!(line.cadence, Cadence::monthly(1));
    }

    #[test]
    fn test_item_without_validity_takes_contract_validity() {
        let item = ContractFixtures::monthly_item();
        let defaults = ContractDefaults {
            validity: DateFixtures::year_2016(),
            ..Default::default()
        };
        let line = billed(invoice_item(item, &defaults, ymd(2016, 12, 15)).unwrap());

        assert_eq!(line.validity, DateFixtures::year_2016());
    }

    #[test]
    fn test_item_validity_keeps_own_bounds() {
        let item = TestItemBuilder::new("Hosting")
            .validity(ValidityInterval::new(Some(ymd(2016, 6, 1)), None))
            .build();
        let defaults = ContractDefaults {
            validity: DateFixtures::year_2016(),
            ..Default::default()
        };
        let line = billed(invoice_item(item, &defaults, ymd(2016, 12, 15)).unwrap());

        assert_eq!(line.validity.start, Some(ymd(2016, 6, 1)));
        assert_eq!(line.validity.end, Some(ymd(2016, 12, 31)));
    }

    #[test]
    fn test_no_cadence_anywhere_is_validation_error() {
        let item = TestItemBuilder::new("Hosting").inherit_cadence().build();
        let err = invoice_item(item, &ContractDefaults::default(), ymd(2016, 12, 15)).unwrap_err();

        assert!(err.is_validation());
    }

    proptest! {
        #[test]
        fn billed_quantity_is_quantity_times_periods(
            item in item_strategy(),
            days_ahead in 0u64..2_000,
        ) {
            let last = item.last_invoiced.unwrap();
            let reference = last + Days::new(days_ahead);
            let per_period = item.billable_quantity();

            match invoice_item(item, &ContractDefaults::default(), reference).unwrap() {
                ItemOutcome::Billed(line) => {
                    prop_assert!(line.periods > 0);
                    prop_assert_eq!(line.quantity, per_period * f64::from(line.periods));
                    prop_assert_eq!(line.coverage.start, last + Days::new(1));
                    prop_assert!(line.coverage.start <= reference);
                    prop_assert!(line.last_invoiced >= reference);
                }
                ItemOutcome::NotDue(_) => prop_assert_eq!(days_ahead, 0),
            }
        }

        #[test]
        fn daily_cadence_advances_by_whole_periods(
            step in 1u32..60,
            days_ahead in 1u64..1_000,
        ) {
            let last = ymd(2016, 1, 31);
            let item = TestItemBuilder::new("Daily")
                .cadence(Cadence::daily(step))
                .last_invoiced(last)
                .build();
            let line = billed(invoice_item(item, &ContractDefaults::default(), last + Days::new(days_ahead)).unwrap());

            let covered = u64::from(line.periods) * u64::from(step);
            prop_assert_eq!(line.last_invoiced, last + Days::new(covered));
        }
    }
}

// ============================================================================
// Contract Aggregator Tests
// ============================================================================

mod aggregator_tests {
    use super::*;

    #[test]
    fn test_dates_set_to_reference() {
        let invoice = invoice_contract(ContractFixtures::monthly_contract(), ymd(2016, 12, 15))
            .unwrap()
            .unwrap();

        assert_eq!(invoice.issue_date, ymd(2016, 12, 15));
        assert_eq!(invoice.tax_point_date, ymd(2016, 12, 15));
        assert_eq!(invoice.order_code(), "code:TEST1");
        assert_eq!(invoice.document_type_code(), "code:TYPE1");
        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.items[1].price_list_code(), "code:CEN1B");
    }

    #[test]
    fn test_not_due_items_are_dropped_in_order() {
        let contract = Contract::new("MIX", "FAKTURA")
            .with_cadence(Cadence::monthly(1))
            .with_item(TestItemBuilder::new("First").build())
            .with_item(
                TestItemBuilder::new("Second")
                    .last_invoiced(ymd(2016, 12, 31))
                    .build(),
            )
            .with_item(TestItemBuilder::new("Third").build());

        let invoice = invoice_contract(contract, ymd(2016, 12, 15)).unwrap().unwrap();

        let lines: Vec<(usize, usize, &str)> = invoice
            .items
            .iter()
            .map(|item| (item.line_number, item.source_index, item.name.as_str()))
            .collect();
        assert_eq!(lines, vec![(1, 0, "First"), (2, 2, "Third")]);
    }

    #[test]
    fn test_contract_with_nothing_due_is_dropped() {
        let result = invoice_contract(ContractFixtures::covered_contract(), ymd(2016, 12, 15)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_empty_contract_is_dropped() {
        let result = invoice_contract(Contract::new("EMPTY", ""), ymd(2016, 12, 15)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_total_sums_lines() {
        let invoice = invoice_contract(ContractFixtures::monthly_contract(), ymd(2016, 12, 15))
            .unwrap()
            .unwrap();

        assert_eq!(invoice.total(), 203.0);
    }

    #[test]
    fn test_error_names_contract_and_item() {
        let contract = Contract::new("BROKEN", "FAKTURA")
            .with_item(TestItemBuilder::new("Orphan").inherit_cadence().build());

        let err = invoice_contract(contract, ymd(2016, 12, 15)).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.location().contract, "BROKEN");
        assert_eq!(err.location().item.as_deref(), Some("Orphan"));
        assert!(err.to_string().contains("contract 'BROKEN', item 'Orphan'"));
    }
}

// ============================================================================
// Batch Orchestrator Tests
// ============================================================================

mod batch_tests {
    use super::*;

    #[test]
    fn test_only_last_invoiced_is_propagated() {
        let mut set = ContractSetBuilder::new()
            .with_contract(ContractFixtures::monthly_contract())
            .build();
        let before = set.clone();

        let run = set.invoice(ymd(2016, 12, 15)).unwrap();

        assert_eq!(run.invoices.len(), 1);
        assert_only_last_invoiced_changed(&before, &set);
        for item in &set.contracts()[0].items {
            assert_eq!(item.last_invoiced, Some(ymd(2016, 12, 31)));
            assert!(item.name.starts_with("Test 1"));
        }
        assert_eq!(set.contracts()[0].items[0].quantity, 1.0);
    }

    #[test]
    fn test_not_due_item_keeps_persisted_date() {
        let mut set = ContractSetBuilder::new()
            .contract("SUP", vec![ContractFixtures::covered_yearly_item()])
            .build();

        let run = set.invoice(ymd(2016, 1, 1)).unwrap();

        assert!(run.is_empty());
        assert_eq!(set.contracts()[0].items[0].last_invoiced, Some(ymd(2016, 1, 1)));
    }

    #[test]
    fn test_never_invoiced_item_gets_persisted_date() {
        let mut set = ContractSetBuilder::new()
            .contract("BKP", vec![ContractFixtures::new_monthly_item()])
            .build();

        set.invoice(ymd(2016, 11, 30)).unwrap();

        assert_eq!(set.contracts()[0].items[0].last_invoiced, Some(ymd(2016, 11, 30)));
    }

    #[test]
    fn test_empty_contracts_bill_nothing() {
        let mut set = ContractFixtures::empty_contracts();
        let before = set.clone();

        let run = set.invoice(ymd(2016, 12, 15)).unwrap();

        assert!(run.is_empty());
        assert_eq!(run.line_count(), 0);
        assert_eq!(set, before);
    }

    #[test]
    fn test_dropped_contract_keeps_items_in_persisted_state() {
        let mut set = ContractSetBuilder::new()
            .with_contract(ContractFixtures::covered_contract())
            .with_contract(ContractFixtures::monthly_contract())
            .build();
        let before = set.clone();

        let run = set.invoice(ymd(2016, 12, 15)).unwrap();

        assert_eq!(run.invoices.len(), 1);
        assert_eq!(run.invoices[0].name(), "TEST1");
        assert_eq!(run.invoices[0].source_index, 1);
        assert_eq!(set.contracts()[0], before.contracts()[0]);
        assert_eq!(set.contracts()[1].items.len(), 2);
    }

    #[test]
    fn test_second_run_same_day_bills_nothing() {
        let mut set = ContractSetBuilder::new()
            .with_contract(ContractFixtures::monthly_contract())
            .build();

        let first = set.invoice(ymd(2016, 12, 15)).unwrap();
        let after_first = set.clone();
        let second = set.invoice(ymd(2016, 12, 15)).unwrap();

        assert_eq!(first.line_count(), 2);
        assert!(second.is_empty());
        assert_eq!(set, after_first);
    }

    #[test]
    fn test_snapshot_is_independent_of_original() {
        let mut set = ContractSetBuilder::new()
            .with_contract(ContractFixtures::monthly_contract())
            .build();

        let mut run = set.invoice(ymd(2016, 12, 15)).unwrap();
        let persisted = set.clone();

        run.invoices[0].items[0].name.push_str(" (changed)");
        run.invoices[0].items[0].quantity = 99.0;
        run.invoices[0].items[0].last_invoiced = ymd(2030, 1, 1);
        run.invoices[0].description.clear();

        assert_eq!(set, persisted);
        assert_eq!(set.contracts()[0].items[0].name, "Test 1a");
        assert_eq!(set.contracts()[0].description, "Test1");
    }

    #[test]
    fn test_original_changes_do_not_reach_snapshot() {
        let mut set = ContractSetBuilder::new()
            .with_contract(ContractFixtures::monthly_contract())
            .build();
        let run = set.invoice(ymd(2016, 12, 15)).unwrap();
        let snapshot = run.clone();

        set.invoice(ymd(2017, 3, 15)).unwrap();

        assert_eq!(run, snapshot);
        assert_eq!(run.invoices[0].items[0].last_invoiced, ymd(2016, 12, 31));
    }

    #[test]
    fn test_failure_leaves_set_untouched() {
        let broken = Contract::new("BROKEN", "FAKTURA")
            .with_item(TestItemBuilder::new("Orphan").inherit_cadence().build());
        let mut set = ContractSetBuilder::new()
            .with_contract(ContractFixtures::monthly_contract())
            .with_contract(broken)
            .build();
        let before = set.clone();

        let err = set.invoice(ymd(2016, 12, 15)).unwrap_err();

        assert!(matches!(err, BillingError::Validation { .. }));
        assert_eq!(set, before);
    }

    #[test]
    fn test_negative_quantity_rejected_on_construction() {
        let contract = Contract::new("NEG", "FAKTURA")
            .with_item(Item::new("Refund", "REF", 10.0).with_quantity(-1.0));

        let err = ContractSet::new(vec![contract]).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.value(), "-1");
    }

    #[test]
    fn test_negative_contract_discount_rejected() {
        let contract = Contract::new("NEG", "FAKTURA").with_discount(-5.0);
        assert!(ContractSet::new(vec![contract]).is_err());
    }

    proptest! {
        #[test]
        fn order_is_preserved_and_only_dates_change(
            set in contract_set_strategy(),
            days_after in 0u64..800,
        ) {
            let reference = ymd(2020, 1, 1) + Days::new(days_after);
            let mut set = set;
            let before = set.clone();

            let run = set.invoice(reference).unwrap();

            let contract_order: Vec<usize> = run.invoices.iter().map(|i| i.source_index).collect();
            prop_assert!(contract_order.windows(2).all(|w| w[0] < w[1]));
            for invoice in &run.invoices {
                let item_order: Vec<usize> = invoice.items.iter().map(|i| i.source_index).collect();
                prop_assert!(item_order.windows(2).all(|w| w[0] < w[1]));
                prop_assert_eq!(invoice.name(), before.contracts()[invoice.source_index].name());
            }
            assert_line_numbers_sequential(&run);
            assert_only_last_invoiced_changed(&before, &set);
        }

        #[test]
        fn rerun_on_same_date_is_idempotent(
            set in contract_set_strategy(),
            days_after in 0u64..800,
        ) {
            let reference = ymd(2020, 1, 1) + Days::new(days_after);
            let mut set = set;

            set.invoice(reference).unwrap();
            let after_first = set.clone();
            let second = set.invoice(reference).unwrap();

            prop_assert!(second.is_empty());
            prop_assert_eq!(set, after_first);
        }
    }
}
