#![forbid(unsafe_code)]

pub mod audit_replay;
pub mod valuation_wiring;
