//! CLI error handling

use std::io;
use std::path::PathBuf;

use core_kernel::CoreError;
use domain_billing::BillingError;
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Usage: {program} input.json [dd.mm.yyyy] > output.xml\n\nWhere dd.mm.yyyy is the invoice date. Otherwise, the current date is used.")]
    Usage { program: String },

    #[error("Invalid invoice date: {0}")]
    ReferenceDate(#[source] CoreError),

    #[error("Cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Malformed contract file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error("Cannot render invoice XML")]
    Render(#[from] std::fmt::Error),
}
