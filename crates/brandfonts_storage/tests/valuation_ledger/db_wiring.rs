#![forbid(unsafe_code)]

use brandfonts_engines::fingerprint::{input_fingerprint, output_fingerprint};
use brandfonts_engines::valuation::{calculate, FORMULA_VERSION_V1};
use brandfonts_kernel_contracts::company::CompanySchemaName;
use brandfonts_kernel_contracts::ledger::{ValuationRecordId, ValuationRecordInput};
use brandfonts_kernel_contracts::valuation::CalculationInput;
use brandfonts_kernel_contracts::{FormulaVersion, MonotonicTimeNs};
use brandfonts_storage::ledger::{StorageError, ValuationLedgerStore};
use brandfonts_storage::repo::ValuationLedgerRepo;

fn company(name: &str) -> CompanySchemaName {
    CompanySchemaName::new(name).unwrap()
}

fn row(
    at: u64,
    company_name: &str,
    idempotency_key: Option<&str>,
    font_count: i64,
) -> ValuationRecordInput {
    let input = CalculationInput::v1(font_count, 100, 75_000.0, "Healthcare".to_string()).unwrap();
    let output = calculate(&input).unwrap();
    ValuationRecordInput::v1(
        MonotonicTimeNs(at),
        company(company_name),
        idempotency_key.map(str::to_string),
        input.clone(),
        output.clone(),
        input_fingerprint(&input),
        output_fingerprint(&output),
    )
    .unwrap()
}

#[test]
fn at_valuation_db_01_append_assigns_monotonic_ids() {
    let mut s = ValuationLedgerStore::new_in_memory();
    let a = s
        .append_valuation_row(row(10, "greenshield", Some("run-a"), 111))
        .unwrap();
    let b = s
        .append_valuation_row(row(11, "greenshield", Some("run-b"), 112))
        .unwrap();
    assert_eq!(a, ValuationRecordId(1));
    assert_eq!(b, ValuationRecordId(2));
    assert_eq!(s.valuation_rows().len(), 2);
    assert_eq!(s.valuation_rows()[0].formula_version, FORMULA_VERSION_V1);
}

#[test]
fn at_valuation_db_02_idempotent_retry_is_noop() {
    let mut s = ValuationLedgerStore::new_in_memory();
    let first = s
        .append_valuation_row(row(10, "hormel", Some("run-1"), 135))
        .unwrap();
    let retry = s
        .append_valuation_row(row(20, "hormel", Some("run-1"), 135))
        .unwrap();
    assert_eq!(first, retry);
    assert_eq!(s.valuation_rows().len(), 1);
    assert_eq!(s.valuation_rows()[0].recorded_at, MonotonicTimeNs(10));
}

#[test]
fn at_valuation_db_03_reused_key_with_different_input_is_rejected() {
    let mut s = ValuationLedgerStore::new_in_memory();
    s.append_valuation_row(row(10, "hormel", Some("run-1"), 135))
        .unwrap();
    let err = s
        .append_valuation_row(row(11, "hormel", Some("run-1"), 136))
        .unwrap_err();
    assert!(matches!(err, StorageError::DuplicateKey { .. }));
    assert_eq!(s.valuation_rows().len(), 1);
}

#[test]
fn at_valuation_db_04_idempotency_is_scoped_per_company() {
    let mut s = ValuationLedgerStore::new_in_memory();
    let a = s
        .append_valuation_row(row(10, "hormel", Some("run-1"), 135))
        .unwrap();
    let b = s
        .append_valuation_row(row(10, "polaris", Some("run-1"), 239))
        .unwrap();
    assert_ne!(a, b);
    assert_eq!(s.valuation_rows_by_company(&company("hormel")).len(), 1);
    assert_eq!(s.valuation_rows_by_company(&company("polaris")).len(), 1);
}

#[test]
fn at_valuation_db_05_rows_without_key_always_append() {
    let mut s = ValuationLedgerStore::new_in_memory();
    s.append_valuation_row(row(10, "oreilly", None, 29)).unwrap();
    s.append_valuation_row(row(11, "oreilly", None, 29)).unwrap();
    assert_eq!(s.valuation_rows().len(), 2);
}

#[test]
fn at_valuation_db_06_ledger_is_append_only() {
    let mut s = ValuationLedgerStore::new_in_memory();
    let id = s
        .append_valuation_row(row(10, "polaris", Some("run-1"), 239))
        .unwrap();
    assert_eq!(
        s.attempt_overwrite_valuation_record(id),
        Err(StorageError::AppendOnlyViolation {
            table: "valuation_records"
        })
    );
}

#[test]
fn at_valuation_db_07_rows_filter_by_formula_version() {
    let mut s = ValuationLedgerStore::new_in_memory();
    s.append_valuation_row(row(10, "polaris", None, 239)).unwrap();
    assert_eq!(s.valuation_rows_by_formula_version(FORMULA_VERSION_V1).len(), 1);
    assert!(s
        .valuation_rows_by_formula_version(FormulaVersion(2))
        .is_empty());
}

#[test]
fn at_valuation_db_08_contract_invalid_row_is_rejected() {
    let mut s = ValuationLedgerStore::new_in_memory();
    let mut bad = row(10, "polaris", None, 239);
    bad.input_fingerprint = "not-a-digest".to_string();
    assert!(matches!(
        s.append_valuation_row(bad),
        Err(StorageError::ContractViolation(_))
    ));
    assert!(s.valuation_rows().is_empty());
}
