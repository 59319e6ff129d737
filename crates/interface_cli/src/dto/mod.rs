//! Data transfer objects for the contract file

pub mod contract;

pub use contract::{ContractRecord, ItemRecord};
