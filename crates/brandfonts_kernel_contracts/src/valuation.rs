#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::{validate_non_negative_finite, validate_sha256_hex};
use crate::{validate_text, ContractViolation, FormulaVersion, SchemaVersion, Validate};

pub const VALUATION_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

/// Upper bound for font and employee counts. Keeps every derived product exactly
/// representable as an `f64` integer.
pub const MAX_COUNT: i64 = 1_000_000_000;
pub const MAX_AVERAGE_SALARY: f64 = 1.0e12;
pub const MAX_INDUSTRY_TYPE_LEN: usize = 128;
pub const MAX_RISK_FACTORS: usize = 8;
pub const MAX_RISK_FACTOR_LEN: usize = 64;
pub const MAX_RISK_SCORE: u8 = 100;

/// Rejection raised by the valuation calculator. Wraps the first violated precondition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid calculation input: {violation}")]
pub struct InvalidInputError {
    pub violation: ContractViolation,
}

impl From<ContractViolation> for InvalidInputError {
    fn from(violation: ContractViolation) -> Self {
        Self { violation }
    }
}

fn default_schema_version() -> SchemaVersion {
    VALUATION_CONTRACT_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    #[serde(default = "default_schema_version")]
    pub schema_version: SchemaVersion,
    pub font_count: i64,
    pub employee_count: i64,
    pub average_salary: f64,
    /// Accepted and validated, not yet used by any formula.
    pub industry_type: String,
}

impl CalculationInput {
    pub fn v1(
        font_count: i64,
        employee_count: i64,
        average_salary: f64,
        industry_type: String,
    ) -> Result<Self, ContractViolation> {
        let i = Self {
            schema_version: VALUATION_CONTRACT_VERSION,
            font_count,
            employee_count,
            average_salary,
            industry_type,
        };
        i.validate()?;
        Ok(i)
    }
}

impl Validate for CalculationInput {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != VALUATION_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "calculation_input.schema_version",
                reason: "must match VALUATION_CONTRACT_VERSION",
            });
        }
        validate_count("calculation_input.font_count", self.font_count)?;
        validate_count("calculation_input.employee_count", self.employee_count)?;
        validate_non_negative_finite(
            "calculation_input.average_salary",
            self.average_salary,
            MAX_AVERAGE_SALARY,
        )?;
        validate_text(
            "calculation_input.industry_type",
            &self.industry_type,
            MAX_INDUSTRY_TYPE_LEN,
        )?;
        Ok(())
    }
}

fn validate_count(field: &'static str, value: i64) -> Result<(), ContractViolation> {
    if !(0..=MAX_COUNT).contains(&value) {
        return Err(ContractViolation::InvalidRange {
            field,
            min: 0.0,
            max: MAX_COUNT as f64,
            got: value as f64,
        });
    }
    Ok(())
}

/// Parses a `CalculationInput` from its camelCase JSON form.
///
/// Absent or `null` fields, wrong types and malformed JSON all surface as
/// `InvalidInputError`; unknown keys are ignored.
pub fn parse_calculation_input_json(text: &str) -> Result<CalculationInput, InvalidInputError> {
    let value: Value = serde_json::from_str(text).map_err(|_| ContractViolation::InvalidValue {
        field: "calculation_input",
        reason: "must be valid JSON",
    })?;
    let obj = value.as_object().ok_or(ContractViolation::InvalidValue {
        field: "calculation_input",
        reason: "must be a JSON object",
    })?;

    if let Some(v) = obj.get("schemaVersion") {
        if v.as_u64() != Some(VALUATION_CONTRACT_VERSION.0 as u64) {
            return Err(ContractViolation::InvalidValue {
                field: "calculation_input.schema_version",
                reason: "must match VALUATION_CONTRACT_VERSION",
            }
            .into());
        }
    }

    let font_count = json_count(obj, "fontCount", "calculation_input.font_count")?;
    let employee_count = json_count(obj, "employeeCount", "calculation_input.employee_count")?;
    let average_salary = required(obj, "averageSalary", "calculation_input.average_salary")?
        .as_f64()
        .ok_or(ContractViolation::InvalidValue {
            field: "calculation_input.average_salary",
            reason: "must be a number",
        })?;
    let industry_type = required(obj, "industryType", "calculation_input.industry_type")?
        .as_str()
        .ok_or(ContractViolation::InvalidValue {
            field: "calculation_input.industry_type",
            reason: "must be a string",
        })?
        .to_string();

    Ok(CalculationInput::v1(
        font_count,
        employee_count,
        average_salary,
        industry_type,
    )?)
}

fn required<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<&'a Value, ContractViolation> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(ContractViolation::InvalidValue {
            field,
            reason: "must be present",
        }),
        Some(v) => Ok(v),
    }
}

fn json_count(
    obj: &Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<i64, ContractViolation> {
    let v = required(obj, key, field)?;
    if let Some(n) = v.as_i64() {
        return Ok(n);
    }
    match v.as_f64() {
        Some(got) if got.fract() == 0.0 && (0.0..=MAX_COUNT as f64).contains(&got) => {
            Ok(got as i64)
        }
        Some(got) if got.fract() == 0.0 => Err(ContractViolation::InvalidRange {
            field,
            min: 0.0,
            max: MAX_COUNT as f64,
            got,
        }),
        Some(_) => Err(ContractViolation::InvalidValue {
            field,
            reason: "must be an integer",
        }),
        None => Err(ContractViolation::InvalidValue {
            field,
            reason: "must be a number",
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactBreakdown {
    pub brand_consistency: f64,
    pub operational_efficiency: f64,
    pub legal_compliance: f64,
}

impl ImpactBreakdown {
    pub fn v1(
        brand_consistency: f64,
        operational_efficiency: f64,
        legal_compliance: f64,
    ) -> Result<Self, ContractViolation> {
        let b = Self {
            brand_consistency,
            operational_efficiency,
            legal_compliance,
        };
        b.validate()?;
        Ok(b)
    }

    /// Sum in fixed term order; `EconomicImpact::value` must equal this bit for bit.
    pub fn total(&self) -> f64 {
        self.brand_consistency + self.operational_efficiency + self.legal_compliance
    }
}

impl Validate for ImpactBreakdown {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_non_negative_finite(
            "impact_breakdown.brand_consistency",
            self.brand_consistency,
            f64::MAX,
        )?;
        validate_non_negative_finite(
            "impact_breakdown.operational_efficiency",
            self.operational_efficiency,
            f64::MAX,
        )?;
        validate_non_negative_finite(
            "impact_breakdown.legal_compliance",
            self.legal_compliance,
            f64::MAX,
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicImpact {
    pub value: f64,
    pub breakdown: ImpactBreakdown,
}

impl EconomicImpact {
    pub fn from_breakdown(breakdown: ImpactBreakdown) -> Result<Self, ContractViolation> {
        let e = Self {
            value: breakdown.total(),
            breakdown,
        };
        e.validate()?;
        Ok(e)
    }
}

impl Validate for EconomicImpact {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.breakdown.validate()?;
        validate_non_negative_finite("economic_impact.value", self.value, f64::MAX)?;
        if self.value.to_bits() != self.breakdown.total().to_bits() {
            return Err(ContractViolation::InvalidValue {
                field: "economic_impact.value",
                reason: "must equal the exact sum of the breakdown",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyGains {
    pub hours_per_year: f64,
    pub cost_savings: f64,
}

impl EfficiencyGains {
    pub fn v1(hours_per_year: f64, cost_savings: f64) -> Result<Self, ContractViolation> {
        let g = Self {
            hours_per_year,
            cost_savings,
        };
        g.validate()?;
        Ok(g)
    }
}

impl Validate for EfficiencyGains {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_non_negative_finite(
            "efficiency_gains.hours_per_year",
            self.hours_per_year,
            f64::MAX,
        )?;
        validate_non_negative_finite("efficiency_gains.cost_savings", self.cost_savings, f64::MAX)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMitigation {
    pub score: u8,
    pub factors: Vec<String>,
}

impl RiskMitigation {
    pub fn v1(score: u8, factors: Vec<String>) -> Result<Self, ContractViolation> {
        let r = Self { score, factors };
        r.validate()?;
        Ok(r)
    }
}

impl Validate for RiskMitigation {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_risk_profile("risk_mitigation", self.score, &self.factors)
    }
}

/// Shared by `RiskMitigation` and valuation policies so both enforce the same bounds.
pub fn validate_risk_profile(
    field: &'static str,
    score: u8,
    factors: &[String],
) -> Result<(), ContractViolation> {
    if score > MAX_RISK_SCORE {
        return Err(ContractViolation::InvalidRange {
            field,
            min: 0.0,
            max: MAX_RISK_SCORE as f64,
            got: score as f64,
        });
    }
    if factors.is_empty() {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "factors must not be empty",
        });
    }
    if factors.len() > MAX_RISK_FACTORS {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "factors must be <= 8",
        });
    }
    for factor in factors {
        validate_text(field, factor, MAX_RISK_FACTOR_LEN)?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationOutput {
    pub schema_version: SchemaVersion,
    pub formula_version: FormulaVersion,
    /// SHA-256 of the policy constants behind `formula_version`.
    pub policy_fingerprint: String,
    pub economic_impact: EconomicImpact,
    pub efficiency_gains: EfficiencyGains,
    pub risk_mitigation: RiskMitigation,
}

impl CalculationOutput {
    pub fn v1(
        formula_version: FormulaVersion,
        policy_fingerprint: String,
        economic_impact: EconomicImpact,
        efficiency_gains: EfficiencyGains,
        risk_mitigation: RiskMitigation,
    ) -> Result<Self, ContractViolation> {
        let o = Self {
            schema_version: VALUATION_CONTRACT_VERSION,
            formula_version,
            policy_fingerprint,
            economic_impact,
            efficiency_gains,
            risk_mitigation,
        };
        o.validate()?;
        Ok(o)
    }
}

impl Validate for CalculationOutput {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != VALUATION_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "calculation_output.schema_version",
                reason: "must match VALUATION_CONTRACT_VERSION",
            });
        }
        if self.formula_version.0 == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "calculation_output.formula_version",
                reason: "must be > 0",
            });
        }
        validate_sha256_hex(
            "calculation_output.policy_fingerprint",
            &self.policy_fingerprint,
        )?;
        self.economic_impact.validate()?;
        self.efficiency_gains.validate()?;
        self.risk_mitigation.validate()?;
        Ok(())
    }
}
