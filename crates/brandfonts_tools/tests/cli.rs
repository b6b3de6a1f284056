use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn brandfonts() -> Command {
    Command::cargo_bin("brandfonts").unwrap()
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

const V2_POLICY: &str = r#"
formula_version = 2
unit_brand_value = 1500.0
unit_efficiency_value = 50.0
legal_compliance_baseline = 5000.0
unit_hours_per_employee = 10.0
work_hours_per_year = 2080.0
risk_score_baseline = 85
risk_factors = ["License compliance", "Brand protection", "Operational continuity"]
"#;

#[test]
fn calculate_representative_scenario_from_flags() {
    let json = stdout_json(brandfonts().args([
        "calculate",
        "--font-count",
        "10",
        "--employee-count",
        "100",
        "--average-salary",
        "75000",
        "--industry-type",
        "technology",
    ]));
    assert_eq!(json["economicImpact"]["breakdown"]["brandConsistency"], 10000.0);
    assert_eq!(json["economicImpact"]["breakdown"]["operationalEfficiency"], 5000.0);
    assert_eq!(json["economicImpact"]["breakdown"]["legalCompliance"], 5000.0);
    assert_eq!(json["efficiencyGains"]["hoursPerYear"], 1000.0);
    assert_eq!(json["riskMitigation"]["factors"].as_array().unwrap().len(), 3);
}

#[test]
fn calculate_reads_json_from_stdin() {
    let json = stdout_json(
        brandfonts()
            .arg("calculate")
            .write_stdin(r#"{"fontCount":0,"employeeCount":0,"averageSalary":0,"industryType":"retail"}"#),
    );
    assert_eq!(json["economicImpact"]["value"], 5000.0);
    assert_eq!(json["efficiencyGains"]["costSavings"], 0.0);
}

#[test]
fn calculate_reads_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("input.json");
    fs::write(
        &path,
        r#"{"fontCount":3,"employeeCount":0,"averageSalary":0,"industryType":"Healthcare"}"#,
    )
    .unwrap();
    let json = stdout_json(brandfonts().arg("calculate").arg("--input").arg(&path));
    assert_eq!(json["economicImpact"]["value"], 8000.0);
}

#[test]
fn negative_font_count_exits_with_input_error() {
    brandfonts()
        .args([
            "calculate",
            "--font-count",
            "-1",
            "--employee-count",
            "100",
            "--average-salary",
            "75000",
            "--industry-type",
            "technology",
        ])
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("calculation_input.font_count"));
}

#[test]
fn empty_industry_type_is_rejected() {
    brandfonts()
        .arg("calculate")
        .write_stdin(r#"{"fontCount":1,"employeeCount":1,"averageSalary":1,"industryType":""}"#)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("calculation_input.industry_type"));
}

#[test]
fn companies_lists_fixture_catalog() {
    let json = stdout_json(brandfonts().arg("companies"));
    let companies = json.as_array().unwrap();
    assert_eq!(companies.len(), 6);
    assert_eq!(companies[0]["schema_name"], "hormel");
}

#[test]
fn company_prints_ledger_row_with_formula_version() {
    let json = stdout_json(brandfonts().args([
        "company",
        "polaris",
        "--employee-count",
        "18500",
        "--average-salary",
        "68000",
    ]));
    assert_eq!(json["record_id"], 1);
    assert_eq!(json["formula_version"], 1);
    assert_eq!(json["company_schema_name"], "polaris");
    assert_eq!(json["output"]["economicImpact"]["breakdown"]["brandConsistency"], 239000.0);
    assert_eq!(json["output_fingerprint"].as_str().unwrap().len(), 64);
    assert_eq!(json["policy_fingerprint"], json["output"]["policyFingerprint"]);
    assert!(json["idempotency_key"].is_null());
}

#[test]
fn company_records_idempotency_key_on_row() {
    let json = stdout_json(brandfonts().args([
        "company",
        "hormel",
        "--employee-count",
        "20000",
        "--average-salary",
        "55000",
        "--idempotency-key",
        "nightly-2026-10-16",
    ]));
    assert_eq!(json["idempotency_key"], "nightly-2026-10-16");
}

#[test]
fn policy_file_stamps_new_formula_version() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("policy.toml");
    fs::write(&path, V2_POLICY).unwrap();

    let json = stdout_json(brandfonts().arg("--policy").arg(&path).args([
        "calculate",
        "--font-count",
        "10",
        "--employee-count",
        "0",
        "--average-salary",
        "0",
        "--industry-type",
        "retail",
    ]));
    assert_eq!(json["formulaVersion"], 2);
    assert_eq!(json["economicImpact"]["value"], 20000.0);
}

#[test]
fn policy_file_reusing_v1_tag_with_edits_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("policy.toml");
    fs::write(&path, V2_POLICY.replace("formula_version = 2", "formula_version = 1")).unwrap();

    brandfonts()
        .arg("--policy")
        .arg(&path)
        .arg("policy")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bump formula_version"));
}

#[test]
fn same_version_policy_files_stamp_distinct_policy_fingerprints() {
    let dir = TempDir::new().unwrap();
    let low = dir.path().join("low.toml");
    let high = dir.path().join("high.toml");
    fs::write(&low, V2_POLICY).unwrap();
    fs::write(
        &high,
        V2_POLICY.replace("unit_brand_value = 1500.0", "unit_brand_value = 9000.0"),
    )
    .unwrap();

    let calc = |path: &std::path::Path| {
        stdout_json(brandfonts().arg("--policy").arg(path).args([
            "calculate",
            "--font-count",
            "10",
            "--employee-count",
            "0",
            "--average-salary",
            "0",
            "--industry-type",
            "retail",
        ]))
    };
    let a = calc(&low);
    let b = calc(&high);
    assert_eq!(a["formulaVersion"], 2);
    assert_eq!(b["formulaVersion"], 2);
    assert_eq!(a["economicImpact"]["breakdown"]["brandConsistency"], 15000.0);
    assert_eq!(b["economicImpact"]["breakdown"]["brandConsistency"], 90000.0);
    assert_eq!(a["policyFingerprint"].as_str().unwrap().len(), 64);
    assert_ne!(a["policyFingerprint"], b["policyFingerprint"]);
}
