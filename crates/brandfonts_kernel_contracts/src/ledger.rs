#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::validate_sha256_hex;
use crate::company::CompanySchemaName;
use crate::valuation::{CalculationInput, CalculationOutput};
use crate::{
    validate_text, ContractViolation, FormulaVersion, MonotonicTimeNs, SchemaVersion, Validate,
};

pub const VALUATION_LEDGER_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 128;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ValuationRecordId(pub u64);

/// Append request for the valuation audit ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRecordInput {
    pub schema_version: SchemaVersion,
    pub recorded_at: MonotonicTimeNs,
    pub company_schema_name: CompanySchemaName,
    pub idempotency_key: Option<String>,
    pub input: CalculationInput,
    pub output: CalculationOutput,
    pub input_fingerprint: String,
    pub output_fingerprint: String,
}

impl ValuationRecordInput {
    pub fn v1(
        recorded_at: MonotonicTimeNs,
        company_schema_name: CompanySchemaName,
        idempotency_key: Option<String>,
        input: CalculationInput,
        output: CalculationOutput,
        input_fingerprint: String,
        output_fingerprint: String,
    ) -> Result<Self, ContractViolation> {
        let r = Self {
            schema_version: VALUATION_LEDGER_CONTRACT_VERSION,
            recorded_at,
            company_schema_name,
            idempotency_key,
            input,
            output,
            input_fingerprint,
            output_fingerprint,
        };
        r.validate()?;
        Ok(r)
    }

    pub fn formula_version(&self) -> FormulaVersion {
        self.output.formula_version
    }
}

impl Validate for ValuationRecordInput {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != VALUATION_LEDGER_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "valuation_record_input.schema_version",
                reason: "must match VALUATION_LEDGER_CONTRACT_VERSION",
            });
        }
        if self.recorded_at.0 == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "valuation_record_input.recorded_at",
                reason: "must be > 0",
            });
        }
        self.company_schema_name.validate()?;
        if let Some(k) = &self.idempotency_key {
            validate_text(
                "valuation_record_input.idempotency_key",
                k,
                MAX_IDEMPOTENCY_KEY_LEN,
            )?;
        }
        self.input.validate()?;
        self.output.validate()?;
        validate_sha256_hex(
            "valuation_record_input.input_fingerprint",
            &self.input_fingerprint,
        )?;
        validate_sha256_hex(
            "valuation_record_input.output_fingerprint",
            &self.output_fingerprint,
        )?;
        Ok(())
    }
}

/// Immutable ledger row. Only the store assigns `record_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRecord {
    pub schema_version: SchemaVersion,
    pub record_id: ValuationRecordId,
    pub recorded_at: MonotonicTimeNs,
    pub company_schema_name: CompanySchemaName,
    pub formula_version: FormulaVersion,
    pub policy_fingerprint: String,
    pub idempotency_key: Option<String>,
    pub input: CalculationInput,
    pub output: CalculationOutput,
    pub input_fingerprint: String,
    pub output_fingerprint: String,
}

impl ValuationRecord {
    pub fn from_input_v1(
        record_id: ValuationRecordId,
        input: ValuationRecordInput,
    ) -> Result<Self, ContractViolation> {
        let r = Self {
            schema_version: VALUATION_LEDGER_CONTRACT_VERSION,
            record_id,
            recorded_at: input.recorded_at,
            company_schema_name: input.company_schema_name,
            formula_version: input.output.formula_version,
            policy_fingerprint: input.output.policy_fingerprint.clone(),
            idempotency_key: input.idempotency_key,
            input: input.input,
            output: input.output,
            input_fingerprint: input.input_fingerprint,
            output_fingerprint: input.output_fingerprint,
        };
        r.validate()?;
        Ok(r)
    }
}

impl Validate for ValuationRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != VALUATION_LEDGER_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "valuation_record.schema_version",
                reason: "must match VALUATION_LEDGER_CONTRACT_VERSION",
            });
        }
        if self.record_id.0 == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "valuation_record.record_id",
                reason: "must be > 0",
            });
        }
        if self.formula_version != self.output.formula_version {
            return Err(ContractViolation::InvalidValue {
                field: "valuation_record.formula_version",
                reason: "must match output.formula_version",
            });
        }
        if self.policy_fingerprint != self.output.policy_fingerprint {
            return Err(ContractViolation::InvalidValue {
                field: "valuation_record.policy_fingerprint",
                reason: "must match output.policy_fingerprint",
            });
        }
        self.company_schema_name.validate()?;
        self.input.validate()?;
        self.output.validate()?;
        validate_sha256_hex("valuation_record.input_fingerprint", &self.input_fingerprint)?;
        validate_sha256_hex(
            "valuation_record.output_fingerprint",
            &self.output_fingerprint,
        )?;
        Ok(())
    }
}
