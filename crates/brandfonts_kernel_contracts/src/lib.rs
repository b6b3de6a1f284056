#![forbid(unsafe_code)]

pub mod common;
pub mod company;
pub mod ledger;
pub mod valuation;

pub use common::{
    validate_text, ContractViolation, FormulaVersion, MonotonicTimeNs, SchemaVersion, Validate,
};
