//! Command Line Layer
//!
//! This crate wires the billing domain to the contract file and the invoice
//! import format.
//!
//! # Architecture
//!
//! - **DTOs**: Contract file records and their conversion into the domain
//! - **Store**: Loading and saving the contract file
//! - **Output**: Invoice XML export and the run summary
//! - **Error Handling**: One error type for everything a run can hit
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_cli::{run, CliConfig, Invocation};
//!
//! let invocation = Invocation::from_args(std::env::args())?;
//! let report = run(&invocation, &CliConfig::default(), today)?;
//! print!("{}", report.xml);
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod output;
pub mod store;

use std::path::PathBuf;

use chrono::NaiveDate;
use core_kernel::temporal::parse_date;
use domain_billing::InvoiceRun;
use tracing::info;

pub use crate::config::CliConfig;
pub use crate::error::CliError;

const DEFAULT_PROGRAM: &str = "recurring-invoice";

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Contract file, read and then overwritten
    pub input: PathBuf,
    /// Invoice date; today when absent
    pub reference_date: Option<NaiveDate>,
}

impl Invocation {
    /// Parses `program input.json [dd.mm.yyyy]`
    pub fn from_args<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let program = args.next().unwrap_or_else(|| DEFAULT_PROGRAM.to_string());
        let rest: Vec<String> = args.collect();

        let (input, date) = match rest.as_slice() {
            [input] => (input, None),
            [input, date] => (input, Some(date)),
            _ => return Err(CliError::Usage { program }),
        };

        let reference_date = date
            .map(|raw| parse_date(raw))
            .transpose()
            .map_err(CliError::ReferenceDate)?;

        Ok(Self {
            input: PathBuf::from(input),
            reference_date,
        })
    }
}

/// Everything a run produces for the caller to print
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run: InvoiceRun,
    /// Import document for the billed snapshot
    pub xml: String,
    /// Summary rows, empty when disabled
    pub summary: String,
}

/// Invoices the contract file named by `invocation`
///
/// The file is rewritten with updated last-invoiced dates only after billing
/// and rendering succeeded.
pub fn run(invocation: &Invocation, config: &CliConfig, today: NaiveDate) -> Result<RunReport, CliError> {
    let reference_date = invocation.reference_date.unwrap_or(today);
    info!(
        input = %invocation.input.display(),
        reference_date = %reference_date,
        "Invoicing contracts"
    );

    let mut contracts = store::load(&invocation.input)?;
    let run = contracts.invoice(reference_date)?;
    let xml = output::render_invoices(&run, &config.xml_source)?;
    store::save(&invocation.input, &contracts)?;

    let summary = if config.summary {
        output::render_summary(&run)
    } else {
        String::new()
    };

    Ok(RunReport { run, xml, summary })
}
