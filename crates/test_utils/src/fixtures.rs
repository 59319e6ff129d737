//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for contracts, items and contract files.
//! These fixtures are consistent and predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::{Cadence, ValidityInterval};
use domain_billing::{Contract, ContractSet, Item};

/// Fixture for dates used across the billing tests
pub struct DateFixtures;

impl DateFixtures {
    /// Builds a date, panicking on an impossible one
    pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// Last day billed by the sample contracts (Nov 30, 2016)
    pub fn last_invoiced() -> NaiveDate {
        Self::ymd(2016, 11, 30)
    }

    /// Mid-December reference date for a monthly run
    pub fn mid_december() -> NaiveDate {
        Self::ymd(2016, 12, 15)
    }

    /// Start of the sample contract validity (Jan 1, 2016)
    pub fn year_start() -> NaiveDate {
        Self::ymd(2016, 1, 1)
    }

    /// End of the sample contract validity (Dec 31, 2016)
    pub fn year_end() -> NaiveDate {
        Self::ymd(2016, 12, 31)
    }

    /// Calendar year 2016 as a validity interval
    pub fn year_2016() -> ValidityInterval {
        ValidityInterval::new(Some(Self::year_start()), Some(Self::year_end()))
    }
}

/// Fixture for domain contracts
pub struct ContractFixtures;

impl ContractFixtures {
    /// Monthly item billed up to Nov 30, 2016
    pub fn monthly_item() -> Item {
        Item::new("Test 1a", "CEN1A", 101.0)
            .with_cadence(Cadence::monthly(1))
            .with_last_invoiced(DateFixtures::last_invoiced())
    }

    /// Yearly item already covered on Jan 1, 2016
    pub fn covered_yearly_item() -> Item {
        Item::new("Support", "SUP", 1200.0)
            .with_cadence(Cadence::yearly(1))
            .with_last_invoiced(DateFixtures::year_start())
    }

    /// Monthly item that was never invoiced
    pub fn new_monthly_item() -> Item {
        Item::new("Backup", "BKP", 50.0).with_cadence(Cadence::monthly(1))
    }

    /// Two monthly items on a monthly contract valid for 2016
    pub fn monthly_contract() -> Contract {
        Contract::new("TEST1", "TYPE1")
            .with_description("Test1")
            .with_validity(DateFixtures::year_2016())
            .with_cadence(Cadence::monthly(1))
            .with_item(Self::monthly_item())
            .with_item(
                Item::new("Test 1b", "CEN1B", 102.0)
                    .with_last_invoiced(DateFixtures::last_invoiced()),
            )
    }

    /// Contract whose only item is not due in December 2016
    pub fn covered_contract() -> Contract {
        Contract::new("TEST2", "TYPE2")
            .with_description("Test2")
            .with_cadence(Cadence::yearly(1))
            .with_item(
                Item::new("Licence", "LIC", 500.0)
                    .with_last_invoiced(DateFixtures::year_end()),
            )
    }

    /// Three contracts with no items
    pub fn empty_contracts() -> ContractSet {
        ContractSet::new(vec![
            Contract::new("TEST1", ""),
            Contract::new("TEST2", ""),
            Contract::new("TEST3", ""),
        ])
        .unwrap()
    }
}

/// Fixture for contract files
pub struct FileFixtures;

impl FileFixtures {
    /// Two contracts, four items, all invoiced up to Nov 30, 2016
    pub const SAMPLE_CONTRACTS: &'static str = r#"
[
  {
    "zakazka": "TEST1",
    "typ_dokladu": "TYPE1",
    "popis": "Test1",
    "platnost": "01.01.2016 - ",
    "frekvence": "0,1,0",
    "polozky": [
      {
        "nazev": "Test 1a",
        "cenik": "CEN1A",
        "mnozstvi": 1,
        "cena": 101,
        "platnost": "01.01.2016 -",
        "vyfakturovano_do": "30.11.2016",
        "frekvence": "0,1,0"
      },
      {
        "nazev": "Test 1b",
        "cenik": "CEN1B",
        "mnozstvi": 1,
        "cena": 102,
        "platnost": "01.01.2016 -",
        "vyfakturovano_do": "30.11.2016",
        "frekvence": "0,1,0"
      }
    ]
  },
  {
    "zakazka": "TEST2",
    "typ_dokladu": "TYPE2",
    "popis": "Test2",
    "platnost": "01.01.2016 - 31.12.2016",
    "frekvence": "0,1,0",
    "sleva": 20,
    "polozky": [
      {
        "nazev": "Test 2a",
        "vyfakturovano_do": "30.11.2016",
        "cenik": "CEN2A",
        "mnozstvi": 2,
        "cena": 201
      },
      {
        "nazev": "Test 2b",
        "vyfakturovano_do": "30.11.2016",
        "cenik": "CEN2B",
        "cena": 202,
        "sleva": 22
      }
    ]
  }
]
"#;

    /// Three contracts with no fields and no items
    pub const EMPTY_CONTRACTS: &'static str = "[{},{},{}]";
}
