//! Contract file persistence
//!
//! The contract file is a JSON array of contract records. It is read once per
//! run and written back after invoicing with updated last-invoiced dates.

use std::fs;
use std::path::Path;

use domain_billing::ContractSet;
use tracing::debug;

use crate::dto::ContractRecord;
use crate::error::CliError;

/// Parses a contract file
pub fn parse_contracts(json: &str) -> Result<ContractSet, CliError> {
    let records: Vec<ContractRecord> = serde_json::from_str(json)?;
    let contracts = records
        .into_iter()
        .map(ContractRecord::into_domain)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ContractSet::new(contracts)?)
}

/// Renders a contract set as a pretty-printed contract file
pub fn render_contracts(contracts: &ContractSet) -> Result<String, CliError> {
    let records: Vec<ContractRecord> = contracts
        .contracts()
        .iter()
        .map(ContractRecord::from)
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Reads and parses the contract file at `path`
pub fn load(path: &Path) -> Result<ContractSet, CliError> {
    let json = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let contracts = parse_contracts(&json)?;
    debug!(path = %path.display(), contracts = contracts.len(), "Loaded contracts");
    Ok(contracts)
}

/// Writes the contract set to `path`, replacing its content
pub fn save(path: &Path, contracts: &ContractSet) -> Result<(), CliError> {
    let mut json = render_contracts(contracts)?;
    json.push('\n');
    fs::write(path, json).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Saved contracts");
    Ok(())
}
