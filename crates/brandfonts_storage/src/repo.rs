#![forbid(unsafe_code)]

use brandfonts_kernel_contracts::company::CompanySchemaName;
use brandfonts_kernel_contracts::ledger::{ValuationRecord, ValuationRecordId, ValuationRecordInput};
use brandfonts_kernel_contracts::FormulaVersion;

use crate::ledger::{StorageError, ValuationLedgerStore};

/// Typed repository interface for valuation audit persistence wiring.
pub trait ValuationLedgerRepo {
    fn append_valuation_row(
        &mut self,
        input: ValuationRecordInput,
    ) -> Result<ValuationRecordId, StorageError>;
    fn valuation_rows(&self) -> &[ValuationRecord];
    fn valuation_rows_by_company(&self, company: &CompanySchemaName) -> Vec<&ValuationRecord>;
    fn valuation_rows_by_formula_version(&self, version: FormulaVersion) -> Vec<&ValuationRecord>;
}

impl ValuationLedgerRepo for ValuationLedgerStore {
    fn append_valuation_row(
        &mut self,
        input: ValuationRecordInput,
    ) -> Result<ValuationRecordId, StorageError> {
        self.append_valuation_record(input)
    }

    fn valuation_rows(&self) -> &[ValuationRecord] {
        self.valuation_records()
    }

    fn valuation_rows_by_company(&self, company: &CompanySchemaName) -> Vec<&ValuationRecord> {
        self.valuation_records_by_company(company)
    }

    fn valuation_rows_by_formula_version(&self, version: FormulaVersion) -> Vec<&ValuationRecord> {
        self.valuation_records_by_formula_version(version)
    }
}
