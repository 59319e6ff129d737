//! Recurring Invoicing - Command Line Binary
//!
//! Bills every due contract item in a contract file and prints the invoices
//! as an import document.
//!
//! # Usage
//!
//! ```bash
//! # Invoice as of today
//! recurring-invoice contracts.json > invoices.xml
//!
//! # Invoice as of a given date
//! recurring-invoice contracts.json 15.12.2016 > invoices.xml
//! ```
//!
//! The contract file is rewritten with the new last-invoiced dates.
//!
//! # Environment Variables
//!
//! * `INVOICING_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `INVOICING_XML_SOURCE` - `source` attribute of the exported XML (default: recurring-invoicing)
//! * `INVOICING_SUMMARY` - Print the run summary to stderr (default: true)

use std::process::ExitCode;

use anyhow::Context;
use interface_cli::{run, CliConfig, CliError, Invocation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = load_config();
    init_tracing(&config.log_level);

    match execute(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match error.downcast_ref::<CliError>() {
                Some(usage @ CliError::Usage { .. }) => eprintln!("{}", usage),
                _ => {
                    tracing::error!(error = %format!("{:#}", error), "Invoicing failed");
                    eprintln!("Error: {:#}", error);
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Parses the command line, runs the invoicing and prints its output.
///
/// # Errors
///
/// Returns an error if the arguments are invalid, the contract file cannot
/// be read or written, or any contract fails to bill.
fn execute(config: &CliConfig) -> anyhow::Result<()> {
    let invocation = Invocation::from_args(std::env::args())?;
    let today = chrono::Local::now().date_naive();

    let report = run(&invocation, config, today)
        .with_context(|| format!("Invoicing {} failed", invocation.input.display()))?;

    print!("{}", report.xml);
    if config.summary {
        eprint!("{}", report.summary);
    }
    Ok(())
}

/// Loads configuration from the environment, falling back to defaults.
fn load_config() -> CliConfig {
    CliConfig::from_env().unwrap_or_else(|error| {
        eprintln!("Ignoring invalid configuration: {}", error);
        CliConfig::default()
    })
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so stdout carries only the exported XML.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
