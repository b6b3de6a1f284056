#![forbid(unsafe_code)]

use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, bail, Context, Result};
use tracing::debug;

use brandfonts_engines::company_catalog::CompanyCatalog;
use brandfonts_engines::valuation::{ValuationPolicy, ValuationRuntime};
use brandfonts_kernel_contracts::valuation::{
    parse_calculation_input_json, CalculationInput, InvalidInputError,
    VALUATION_CONTRACT_VERSION,
};
use brandfonts_kernel_contracts::{ContractViolation, MonotonicTimeNs};
use brandfonts_os::valuation_wiring::{
    CompanyValuationInput, CompanyValuationOutcome, CompanyValuationWiring,
    CompanyValuationWiringConfig,
};
use brandfonts_storage::ledger::ValuationLedgerStore;

use crate::cli::{CalculateArgs, Cli, Command, CompanyArgs};

pub fn load_runtime(policy: Option<&Path>) -> Result<ValuationRuntime> {
    let Some(path) = policy else {
        return Ok(ValuationRuntime::mvp_v1());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading valuation policy {}", path.display()))?;
    let policy = ValuationPolicy::from_toml_str(&text)?;
    debug!(
        path = %path.display(),
        formula_version = policy.formula_version.0,
        "loaded valuation policy"
    );
    Ok(ValuationRuntime::new(policy)?)
}

/// Runs one CLI command and returns what should be printed on stdout.
pub fn execute(cli: &Cli, stdin: &mut dyn Read) -> Result<String> {
    let runtime = load_runtime(cli.policy.as_deref())?;
    match &cli.command {
        Command::Calculate(args) => run_calculate(&runtime, args, stdin),
        Command::Companies => {
            let catalog = CompanyCatalog::fixtures_v1()?;
            Ok(serde_json::to_string_pretty(catalog.list())?)
        }
        Command::Company(args) => run_company(runtime, args),
        Command::Policy => Ok(toml::to_string(runtime.policy())?),
    }
}

fn run_calculate(
    runtime: &ValuationRuntime,
    args: &CalculateArgs,
    stdin: &mut dyn Read,
) -> Result<String> {
    let input = if let Some(path) = &args.input {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading calculation input {}", path.display()))?;
        parse_calculation_input_json(&text)?
    } else if args.has_field_flags() {
        input_from_flags(args)?
    } else {
        let mut text = String::new();
        stdin
            .read_to_string(&mut text)
            .context("reading calculation input from stdin")?;
        parse_calculation_input_json(&text)?
    };

    let output = runtime.calculate(&input)?;
    Ok(serde_json::to_string_pretty(&output)?)
}

fn input_from_flags(args: &CalculateArgs) -> Result<CalculationInput, InvalidInputError> {
    Ok(CalculationInput {
        schema_version: VALUATION_CONTRACT_VERSION,
        font_count: args
            .font_count
            .ok_or_else(|| missing("calculation_input.font_count"))?,
        employee_count: args
            .employee_count
            .ok_or_else(|| missing("calculation_input.employee_count"))?,
        average_salary: args
            .average_salary
            .ok_or_else(|| missing("calculation_input.average_salary"))?,
        industry_type: args
            .industry_type
            .clone()
            .ok_or_else(|| missing("calculation_input.industry_type"))?,
    })
}

fn missing(field: &'static str) -> InvalidInputError {
    ContractViolation::InvalidValue {
        field,
        reason: "must be present",
    }
    .into()
}

fn run_company(runtime: ValuationRuntime, args: &CompanyArgs) -> Result<String> {
    let catalog = CompanyCatalog::fixtures_v1()?;
    let company = catalog
        .get(&args.schema_name)
        .ok_or_else(|| anyhow!("unknown company schema name: {}", args.schema_name))?
        .clone();

    let input = CompanyValuationInput::v1(
        company,
        args.employee_count,
        args.average_salary,
        now_ns(),
        args.idempotency_key.clone(),
    )?;
    let wiring = CompanyValuationWiring::new(CompanyValuationWiringConfig::mvp_v1(true), runtime);
    let mut store = ValuationLedgerStore::new_in_memory();

    match wiring.run_company(&mut store, &input)? {
        CompanyValuationOutcome::Recorded(rec) => {
            let row = store
                .record(rec.record_id)
                .ok_or_else(|| anyhow!("ledger row {} missing after append", rec.record_id.0))?;
            Ok(serde_json::to_string_pretty(row)?)
        }
        CompanyValuationOutcome::Refused(err) => Err(err.into()),
        CompanyValuationOutcome::NotInvokedDisabled => bail!("valuation is disabled"),
    }
}

fn now_ns() -> MonotonicTimeNs {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos().min(u64::MAX as u128) as u64)
        .unwrap_or(0);
    MonotonicTimeNs(nanos.max(1))
}
