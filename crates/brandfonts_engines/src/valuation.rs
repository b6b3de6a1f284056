#![forbid(unsafe_code)]

//! Font valuation calculator.
//!
//! Maps an organization's font and workforce profile to economic impact, efficiency
//! gains and risk mitigation figures. Every constant lives in a [`ValuationPolicy`]
//! whose [`FormulaVersion`] and SHA-256 policy fingerprint are stamped on each
//! output, so historical figures can be traced to the exact constants that
//! produced them even when two policies share a version number.

use serde::{Deserialize, Serialize};

use brandfonts_kernel_contracts::valuation::{
    validate_risk_profile, CalculationInput, CalculationOutput, EconomicImpact, EfficiencyGains,
    ImpactBreakdown, InvalidInputError, RiskMitigation,
};
use brandfonts_kernel_contracts::{ContractViolation, FormulaVersion, Validate};

use crate::fingerprint::policy_fingerprint;

pub const FORMULA_VERSION_V1: FormulaVersion = FormulaVersion(1);

/// Currency units attributed to brand consistency per distinct font.
pub const UNIT_BRAND_VALUE: f64 = 1000.0;
/// Currency units attributed to operational efficiency per employee.
pub const UNIT_EFFICIENCY_VALUE: f64 = 50.0;
/// Flat legal compliance value, independent of organization size.
pub const LEGAL_COMPLIANCE_BASELINE: f64 = 5000.0;
/// Hours saved per employee per year.
pub const UNIT_HOURS_PER_EMPLOYEE: f64 = 10.0;
/// Standard full-time hours per year; converts annual salary into an hourly rate.
pub const WORK_HOURS_PER_YEAR: f64 = 2080.0;
/// Placeholder risk score until a per-factor risk model exists.
pub const RISK_SCORE_BASELINE: u8 = 85;
pub const RISK_FACTORS_V1: [&str; 3] = [
    "License compliance",
    "Brand protection",
    "Operational continuity",
];

pub const MAX_UNIT_VALUE: f64 = 1.0e9;
pub const MIN_WORK_HOURS_PER_YEAR: f64 = 1.0;
pub const MAX_WORK_HOURS_PER_YEAR: f64 = 8784.0;

#[derive(Debug, thiserror::Error)]
pub enum PolicyLoadError {
    #[error("valuation policy is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("valuation policy rejected: {0}")]
    Contract(#[from] ContractViolation),
}

/// Named, versioned valuation constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValuationPolicy {
    pub formula_version: FormulaVersion,
    pub unit_brand_value: f64,
    pub unit_efficiency_value: f64,
    pub legal_compliance_baseline: f64,
    pub unit_hours_per_employee: f64,
    pub work_hours_per_year: f64,
    pub risk_score_baseline: u8,
    pub risk_factors: Vec<String>,
}

impl ValuationPolicy {
    pub fn mvp_v1() -> Self {
        Self {
            formula_version: FORMULA_VERSION_V1,
            unit_brand_value: UNIT_BRAND_VALUE,
            unit_efficiency_value: UNIT_EFFICIENCY_VALUE,
            legal_compliance_baseline: LEGAL_COMPLIANCE_BASELINE,
            unit_hours_per_employee: UNIT_HOURS_PER_EMPLOYEE,
            work_hours_per_year: WORK_HOURS_PER_YEAR,
            risk_score_baseline: RISK_SCORE_BASELINE,
            risk_factors: RISK_FACTORS_V1.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, PolicyLoadError> {
        let policy: Self = toml::from_str(text)?;
        policy.validate()?;
        Ok(policy)
    }
}

impl Validate for ValuationPolicy {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.formula_version.0 == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "valuation_policy.formula_version",
                reason: "must be > 0",
            });
        }
        validate_unit("valuation_policy.unit_brand_value", self.unit_brand_value)?;
        validate_unit(
            "valuation_policy.unit_efficiency_value",
            self.unit_efficiency_value,
        )?;
        validate_unit(
            "valuation_policy.legal_compliance_baseline",
            self.legal_compliance_baseline,
        )?;
        validate_unit(
            "valuation_policy.unit_hours_per_employee",
            self.unit_hours_per_employee,
        )?;
        if !self.work_hours_per_year.is_finite() {
            return Err(ContractViolation::NotFinite {
                field: "valuation_policy.work_hours_per_year",
            });
        }
        if !(MIN_WORK_HOURS_PER_YEAR..=MAX_WORK_HOURS_PER_YEAR).contains(&self.work_hours_per_year)
        {
            return Err(ContractViolation::InvalidRange {
                field: "valuation_policy.work_hours_per_year",
                min: MIN_WORK_HOURS_PER_YEAR,
                max: MAX_WORK_HOURS_PER_YEAR,
                got: self.work_hours_per_year,
            });
        }
        validate_risk_profile(
            "valuation_policy.risk_factors",
            self.risk_score_baseline,
            &self.risk_factors,
        )?;
        if self.formula_version == FORMULA_VERSION_V1 && *self != Self::mvp_v1() {
            return Err(ContractViolation::InvalidValue {
                field: "valuation_policy.formula_version",
                reason: "FORMULA_VERSION_V1 is bound to the v1 constants; bump formula_version",
            });
        }
        Ok(())
    }
}

fn validate_unit(field: &'static str, value: f64) -> Result<(), ContractViolation> {
    if !value.is_finite() {
        return Err(ContractViolation::NotFinite { field });
    }
    if !(0.0..=MAX_UNIT_VALUE).contains(&value) {
        return Err(ContractViolation::InvalidRange {
            field,
            min: 0.0,
            max: MAX_UNIT_VALUE,
            got: value,
        });
    }
    Ok(())
}

/// Stateless valuation calculator bound to one policy. `Send + Sync`; share freely.
#[derive(Debug, Clone)]
pub struct ValuationRuntime {
    policy: ValuationPolicy,
    policy_fingerprint: String,
}

impl ValuationRuntime {
    pub fn new(policy: ValuationPolicy) -> Result<Self, ContractViolation> {
        policy.validate()?;
        Ok(Self::bind(policy))
    }

    pub fn mvp_v1() -> Self {
        Self::bind(ValuationPolicy::mvp_v1())
    }

    fn bind(policy: ValuationPolicy) -> Self {
        Self {
            policy_fingerprint: policy_fingerprint(&policy),
            policy,
        }
    }

    pub fn policy(&self) -> &ValuationPolicy {
        &self.policy
    }

    pub fn policy_fingerprint(&self) -> &str {
        &self.policy_fingerprint
    }

    pub fn formula_version(&self) -> FormulaVersion {
        self.policy.formula_version
    }

    pub fn calculate(
        &self,
        input: &CalculationInput,
    ) -> Result<CalculationOutput, InvalidInputError> {
        input.validate()?;

        let economic_impact = self.economic_impact(input)?;
        let efficiency_gains = self.efficiency_gains(input)?;
        let risk_mitigation = self.risk_mitigation()?;

        Ok(CalculationOutput::v1(
            self.policy.formula_version,
            self.policy_fingerprint.clone(),
            economic_impact,
            efficiency_gains,
            risk_mitigation,
        )?)
    }

    fn economic_impact(&self, input: &CalculationInput) -> Result<EconomicImpact, ContractViolation> {
        let p = &self.policy;
        let breakdown = ImpactBreakdown::v1(
            input.font_count as f64 * p.unit_brand_value,
            input.employee_count as f64 * p.unit_efficiency_value,
            p.legal_compliance_baseline,
        )?;
        EconomicImpact::from_breakdown(breakdown)
    }

    fn efficiency_gains(
        &self,
        input: &CalculationInput,
    ) -> Result<EfficiencyGains, ContractViolation> {
        let p = &self.policy;
        let hours_per_year = input.employee_count as f64 * p.unit_hours_per_employee;
        let hourly_rate = input.average_salary / p.work_hours_per_year;
        EfficiencyGains::v1(hours_per_year, hours_per_year * hourly_rate)
    }

    fn risk_mitigation(&self) -> Result<RiskMitigation, ContractViolation> {
        RiskMitigation::v1(
            self.policy.risk_score_baseline,
            self.policy.risk_factors.clone(),
        )
    }
}

/// Values `input` under the v1 policy.
pub fn calculate(input: &CalculationInput) -> Result<CalculationOutput, InvalidInputError> {
    ValuationRuntime::mvp_v1().calculate(input)
}
