//! Period counting for a single item
//!
//! Billing is in advance: every period whose first day is on or before the
//! reference date is billed in full, and the item's last-invoiced marker
//! moves to the last day of the final billed period.

use chrono::NaiveDate;

use core_kernel::temporal::offset_days;
use core_kernel::{CoreError, DateRange};

use crate::contract::{ContractDefaults, Item};
use crate::invoice::BilledItem;

/// Result of running the recurrence engine over one item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// No period has elapsed; the item is returned untouched
    NotDue(Item),
    /// At least one period has elapsed
    Billed(BilledItem),
}

impl ItemOutcome {
    /// Number of periods billed, zero when not due
    pub fn elapsed_periods(&self) -> u32 {
        match self {
            ItemOutcome::NotDue(_) => 0,
            ItemOutcome::Billed(billed) => billed.periods,
        }
    }
}

/// Bills every period of `item` that has started by `reference_date`
///
/// An item that was never invoiced is treated as invoiced up to one cadence
/// before the reference date, so its first run bills exactly one period.
///
/// # Errors
///
/// Returns a validation error when neither the item nor the contract define
/// a cadence, or when a date leaves the supported calendar range.
pub fn invoice_item(
    item: Item,
    defaults: &ContractDefaults,
    reference_date: NaiveDate,
) -> Result<ItemOutcome, CoreError> {
    let cadence = item.cadence.or(defaults.cadence);
    if cadence.is_inherit() {
        return Err(CoreError::validation(
            cadence.to_string(),
            "leaves the item without a cadence; set one on the item or its contract",
        ));
    }

    let validity = item
        .validity
        .unwrap_or_default()
        .inherit_from(&defaults.validity);

    let last_invoiced = match item.last_invoiced {
        Some(date) => date,
        None => cadence.rewind(reference_date)?,
    };

    let start = offset_days(last_invoiced, 1)?;
    let mut cursor = start;
    let mut periods = 0u32;
    while cursor <= reference_date {
        cursor = cadence.advance(cursor)?;
        periods += 1;
    }

    if periods == 0 {
        return Ok(ItemOutcome::NotDue(item));
    }

    let end = offset_days(cursor, -1)?;
    let coverage = DateRange::new(start, end)?;
    let quantity = item.billable_quantity() * f64::from(periods);

    Ok(ItemOutcome::Billed(BilledItem {
        line_number: 0,
        source_index: 0,
        description: describe(&item.name, periods, &coverage),
        name: item.name,
        price_list: item.price_list,
        quantity,
        unit_price: item.unit_price,
        discount: item.discount,
        periods,
        coverage,
        cadence,
        validity,
        last_invoiced: end,
    }))
}

fn describe(name: &str, periods: u32, coverage: &DateRange) -> String {
    let unit = if periods == 1 { "period" } else { "periods" };
    format!("{} for {} {} ({})", name, periods, unit, coverage)
}
