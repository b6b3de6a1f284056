#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use brandfonts_kernel_contracts::company::CompanySchemaName;
use brandfonts_kernel_contracts::ledger::{ValuationRecord, ValuationRecordId, ValuationRecordInput};
use brandfonts_kernel_contracts::{ContractViolation, FormulaVersion, Validate};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    #[error("duplicate key in {table}: {key}")]
    DuplicateKey { table: &'static str, key: String },
    #[error("{table} is append-only")]
    AppendOnlyViolation { table: &'static str },
    #[error(transparent)]
    ContractViolation(#[from] ContractViolation),
}

/// In-memory valuation audit ledger.
///
/// Rows are never updated or removed. A retried append with the same
/// `(company, idempotency_key)` is a deterministic no-op that returns the original id.
#[derive(Debug, Default)]
pub struct ValuationLedgerStore {
    valuation_records: Vec<ValuationRecord>,
    next_record_id: u64,
    // (company, idempotency_key) -> record_id
    idempotency_index: BTreeMap<(CompanySchemaName, String), ValuationRecordId>,
}

impl ValuationLedgerStore {
    pub fn new_in_memory() -> Self {
        Self {
            valuation_records: Vec::new(),
            next_record_id: 1,
            idempotency_index: BTreeMap::new(),
        }
    }

    pub fn append_valuation_record(
        &mut self,
        input: ValuationRecordInput,
    ) -> Result<ValuationRecordId, StorageError> {
        input.validate()?;

        if let Some(k) = &input.idempotency_key {
            let idx = (input.company_schema_name.clone(), k.clone());
            if let Some(existing) = self.idempotency_index.get(&idx) {
                let original = self.record(*existing).ok_or(StorageError::DuplicateKey {
                    table: "valuation_records",
                    key: k.clone(),
                })?;
                if original.input_fingerprint != input.input_fingerprint {
                    return Err(StorageError::DuplicateKey {
                        table: "valuation_records",
                        key: k.clone(),
                    });
                }
                return Ok(*existing);
            }
        }

        let record_id = ValuationRecordId(self.next_record_id.max(1));
        self.next_record_id = record_id.0.saturating_add(1);

        let record = ValuationRecord::from_input_v1(record_id, input)?;
        if let Some(k) = &record.idempotency_key {
            self.idempotency_index
                .insert((record.company_schema_name.clone(), k.clone()), record_id);
        }
        self.valuation_records.push(record);
        Ok(record_id)
    }

    pub fn attempt_overwrite_valuation_record(
        &mut self,
        _record_id: ValuationRecordId,
    ) -> Result<(), StorageError> {
        Err(StorageError::AppendOnlyViolation {
            table: "valuation_records",
        })
    }

    pub fn valuation_records(&self) -> &[ValuationRecord] {
        &self.valuation_records
    }

    pub fn record(&self, record_id: ValuationRecordId) -> Option<&ValuationRecord> {
        self.valuation_records
            .iter()
            .find(|r| r.record_id == record_id)
    }

    pub fn valuation_records_by_company(
        &self,
        company: &CompanySchemaName,
    ) -> Vec<&ValuationRecord> {
        self.valuation_records
            .iter()
            .filter(|r| &r.company_schema_name == company)
            .collect()
    }

    pub fn valuation_records_by_formula_version(
        &self,
        version: FormulaVersion,
    ) -> Vec<&ValuationRecord> {
        self.valuation_records
            .iter()
            .filter(|r| r.formula_version == version)
            .collect()
    }
}
