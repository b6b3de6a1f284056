#![forbid(unsafe_code)]

pub mod company_catalog;
pub mod fingerprint;
pub mod font_stats;
pub mod valuation;
