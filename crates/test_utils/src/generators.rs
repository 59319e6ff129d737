//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating contracts and dates that
//! keep the domain invariants.

use chrono::{Days, NaiveDate};
use core_kernel::Cadence;
use domain_billing::{Contract, ContractSet, Item};
use proptest::prelude::*;

/// Strategy for dates between 2000 and roughly 2040
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..15_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Days::new(offset)
    })
}

/// Strategy for non-inherit cadences (1-3 years, 1-12 months or 1-60 days)
pub fn cadence_strategy() -> impl Strategy<Value = Cadence> {
    prop_oneof![
        (1u32..=3).prop_map(Cadence::yearly),
        (1u32..=12).prop_map(Cadence::monthly),
        (1u32..=60).prop_map(Cadence::daily),
    ]
}

/// Strategy for quantities, including zero which bills as one
pub fn quantity_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), (1u32..100).prop_map(f64::from)]
}

/// Strategy for an item invoiced up to some date, with its own cadence
pub fn item_strategy() -> impl Strategy<Value = Item> {
    (
        "[A-Z][a-z]{2,10}",
        quantity_strategy(),
        1u32..10_000,
        cadence_strategy(),
        date_strategy(),
    )
        .prop_map(|(name, quantity, price, cadence, last_invoiced)| {
            Item::new(name, "CEN", f64::from(price))
                .with_quantity(quantity)
                .with_cadence(cadence)
                .with_last_invoiced(last_invoiced)
        })
}

/// Strategy for a contract with up to `max_items` items
pub fn contract_strategy(max_items: usize) -> impl Strategy<Value = Contract> {
    (
        "[A-Z]{3}[0-9]{1,3}",
        cadence_strategy(),
        prop::collection::vec(item_strategy(), 0..=max_items),
    )
        .prop_map(|(order_ref, cadence, items)| {
            items.into_iter().fold(
                Contract::new(order_ref, "FAKTURA").with_cadence(cadence),
                Contract::with_item,
            )
        })
}

/// Strategy for a valid contract set
pub fn contract_set_strategy() -> impl Strategy<Value = ContractSet> {
    prop::collection::vec(contract_strategy(5), 0..6)
        .prop_map(|contracts| ContractSet::new(contracts).unwrap())
}
