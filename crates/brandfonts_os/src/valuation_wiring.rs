#![forbid(unsafe_code)]

use serde::Serialize;
use tracing::{debug, info, warn};

use brandfonts_engines::fingerprint::{input_fingerprint, output_fingerprint};
use brandfonts_engines::valuation::ValuationRuntime;
use brandfonts_kernel_contracts::company::CompanyProfile;
use brandfonts_kernel_contracts::ledger::{
    ValuationRecordId, ValuationRecordInput, MAX_IDEMPOTENCY_KEY_LEN,
};
use brandfonts_kernel_contracts::valuation::{
    CalculationInput, CalculationOutput, InvalidInputError, VALUATION_CONTRACT_VERSION,
};
use brandfonts_kernel_contracts::{
    validate_text, ContractViolation, FormulaVersion, MonotonicTimeNs, Validate,
};
use brandfonts_storage::ledger::StorageError;
use brandfonts_storage::repo::ValuationLedgerRepo;

pub trait ValuationEngine {
    fn formula_version(&self) -> FormulaVersion;
    fn policy_fingerprint(&self) -> &str;
    fn calculate(&self, input: &CalculationInput) -> Result<CalculationOutput, InvalidInputError>;
}

impl ValuationEngine for ValuationRuntime {
    fn formula_version(&self) -> FormulaVersion {
        ValuationRuntime::formula_version(self)
    }

    fn policy_fingerprint(&self) -> &str {
        ValuationRuntime::policy_fingerprint(self)
    }

    fn calculate(&self, input: &CalculationInput) -> Result<CalculationOutput, InvalidInputError> {
        ValuationRuntime::calculate(self, input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyValuationWiringConfig {
    pub valuation_enabled: bool,
}

impl CompanyValuationWiringConfig {
    pub fn mvp_v1(valuation_enabled: bool) -> Self {
        Self { valuation_enabled }
    }
}

/// A company profile plus the workforce figures the dashboard does not store.
///
/// Workforce figures are checked by the calculator, not here, so bad figures
/// surface as `CompanyValuationOutcome::Refused` rather than a wiring error.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyValuationInput {
    pub company: CompanyProfile,
    pub employee_count: i64,
    pub average_salary: f64,
    pub recorded_at: MonotonicTimeNs,
    pub idempotency_key: Option<String>,
}

impl CompanyValuationInput {
    pub fn v1(
        company: CompanyProfile,
        employee_count: i64,
        average_salary: f64,
        recorded_at: MonotonicTimeNs,
        idempotency_key: Option<String>,
    ) -> Result<Self, ContractViolation> {
        let i = Self {
            company,
            employee_count,
            average_salary,
            recorded_at,
            idempotency_key,
        };
        i.validate()?;
        Ok(i)
    }

    pub fn calculation_input(&self) -> CalculationInput {
        CalculationInput {
            schema_version: VALUATION_CONTRACT_VERSION,
            font_count: i64::from(self.company.stats.unique_fonts),
            employee_count: self.employee_count,
            average_salary: self.average_salary,
            industry_type: self.company.industry.clone(),
        }
    }
}

impl Validate for CompanyValuationInput {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.company.validate()?;
        if self.recorded_at.0 == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "company_valuation_input.recorded_at",
                reason: "must be > 0",
            });
        }
        if let Some(k) = &self.idempotency_key {
            validate_text(
                "company_valuation_input.idempotency_key",
                k,
                MAX_IDEMPOTENCY_KEY_LEN,
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedValuation {
    pub record_id: ValuationRecordId,
    pub formula_version: FormulaVersion,
    pub input_fingerprint: String,
    pub output_fingerprint: String,
    pub output: CalculationOutput,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompanyValuationOutcome {
    NotInvokedDisabled,
    Refused(InvalidInputError),
    Recorded(RecordedValuation),
}

#[derive(Debug, Clone)]
pub struct CompanyValuationWiring<E>
where
    E: ValuationEngine,
{
    config: CompanyValuationWiringConfig,
    engine: E,
}

impl<E> CompanyValuationWiring<E>
where
    E: ValuationEngine,
{
    pub fn new(config: CompanyValuationWiringConfig, engine: E) -> Self {
        Self { config, engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn run_company<R>(
        &self,
        repo: &mut R,
        input: &CompanyValuationInput,
    ) -> Result<CompanyValuationOutcome, StorageError>
    where
        R: ValuationLedgerRepo,
    {
        input.validate()?;
        let company = input.company.schema_name.as_str();

        if !self.config.valuation_enabled {
            debug!(company, "valuation disabled; skipping");
            return Ok(CompanyValuationOutcome::NotInvokedDisabled);
        }

        let calc_input = input.calculation_input();
        let output = match self.engine.calculate(&calc_input) {
            Ok(output) => output,
            Err(err) => {
                warn!(company, field = err.violation.field(), "valuation refused: {err}");
                return Ok(CompanyValuationOutcome::Refused(err));
            }
        };
        output.validate()?;
        if output.formula_version != self.engine.formula_version() {
            return Err(ContractViolation::InvalidValue {
                field: "calculation_output.formula_version",
                reason: "must match the engine formula version",
            }
            .into());
        }
        if output.policy_fingerprint != self.engine.policy_fingerprint() {
            return Err(ContractViolation::InvalidValue {
                field: "calculation_output.policy_fingerprint",
                reason: "must match the engine policy fingerprint",
            }
            .into());
        }

        let input_fp = input_fingerprint(&calc_input);
        let output_fp = output_fingerprint(&output);
        let record_id = repo.append_valuation_row(ValuationRecordInput::v1(
            input.recorded_at,
            input.company.schema_name.clone(),
            input.idempotency_key.clone(),
            calc_input,
            output.clone(),
            input_fp.clone(),
            output_fp.clone(),
        )?)?;

        info!(
            company,
            record_id = record_id.0,
            formula_version = output.formula_version.0,
            policy = %output.policy_fingerprint,
            economic_impact = output.economic_impact.value,
            "valuation recorded"
        );
        Ok(CompanyValuationOutcome::Recorded(RecordedValuation {
            record_id,
            formula_version: output.formula_version,
            input_fingerprint: input_fp,
            output_fingerprint: output_fp,
            output,
        }))
    }
}
