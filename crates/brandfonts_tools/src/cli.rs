#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "brandfonts",
    version,
    about = "Font portfolio valuation: economic impact, efficiency gains and risk mitigation"
)]
pub struct Cli {
    /// TOML valuation policy to use instead of the built-in v1 constants
    #[arg(long, global = true, value_name = "FILE")]
    pub policy: Option<PathBuf>,

    /// Increase log verbosity on stderr (-v, -vv, -vvv); BRANDFONTS_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Value one organization profile (JSON file, flags, or JSON on stdin)
    Calculate(CalculateArgs),
    /// List the fixture company catalog
    Companies,
    /// Value a catalog company and print the resulting ledger row
    Company(CompanyArgs),
    /// Print the active valuation policy as TOML
    Policy,
}

#[derive(Debug, Args)]
pub struct CalculateArgs {
    /// JSON CalculationInput file
    #[arg(long, value_name = "FILE", conflicts_with_all = ["font_count", "employee_count", "average_salary", "industry_type"])]
    pub input: Option<PathBuf>,

    #[arg(long, allow_negative_numbers = true)]
    pub font_count: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    pub employee_count: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    pub average_salary: Option<f64>,

    #[arg(long)]
    pub industry_type: Option<String>,
}

impl CalculateArgs {
    pub fn has_field_flags(&self) -> bool {
        self.font_count.is_some()
            || self.employee_count.is_some()
            || self.average_salary.is_some()
            || self.industry_type.is_some()
    }
}

#[derive(Debug, Args)]
pub struct CompanyArgs {
    /// Company schema name, e.g. `hormel`
    pub schema_name: String,

    #[arg(long, allow_negative_numbers = true)]
    pub employee_count: i64,

    #[arg(long, allow_negative_numbers = true)]
    pub average_salary: f64,

    /// Stored on the printed ledger row. Each run starts a fresh in-memory
    /// ledger, so retries are only collapsed by a long-lived store.
    #[arg(long)]
    pub idempotency_key: Option<String>,
}
