#![forbid(unsafe_code)]

use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use brandfonts_kernel_contracts::valuation::{CalculationInput, CalculationOutput};

use crate::valuation::ValuationPolicy;

// Floats are encoded by bit pattern and strings are length-prefixed, so two
// values share a fingerprint only when they are bit-identical.

pub fn input_fingerprint(input: &CalculationInput) -> String {
    let mut canonical = String::from("calculation_input");
    push_field(&mut canonical, "schema_version", &input.schema_version.0.to_string());
    push_field(&mut canonical, "font_count", &input.font_count.to_string());
    push_field(&mut canonical, "employee_count", &input.employee_count.to_string());
    push_f64(&mut canonical, "average_salary", input.average_salary);
    push_text(&mut canonical, "industry_type", &input.industry_type);
    sha256_hex(canonical.as_bytes())
}

/// Identifies the exact constant set behind a formula version.
pub fn policy_fingerprint(policy: &ValuationPolicy) -> String {
    let mut canonical = String::from("valuation_policy");
    push_field(&mut canonical, "formula_version", &policy.formula_version.0.to_string());
    push_f64(&mut canonical, "unit_brand_value", policy.unit_brand_value);
    push_f64(&mut canonical, "unit_efficiency_value", policy.unit_efficiency_value);
    push_f64(
        &mut canonical,
        "legal_compliance_baseline",
        policy.legal_compliance_baseline,
    );
    push_f64(
        &mut canonical,
        "unit_hours_per_employee",
        policy.unit_hours_per_employee,
    );
    push_f64(&mut canonical, "work_hours_per_year", policy.work_hours_per_year);
    push_field(
        &mut canonical,
        "risk_score_baseline",
        &policy.risk_score_baseline.to_string(),
    );
    push_field(
        &mut canonical,
        "risk_factors",
        &policy.risk_factors.len().to_string(),
    );
    for factor in &policy.risk_factors {
        push_text(&mut canonical, "risk_factor", factor);
    }
    sha256_hex(canonical.as_bytes())
}

pub fn output_fingerprint(output: &CalculationOutput) -> String {
    let mut canonical = String::from("calculation_output");
    push_field(&mut canonical, "schema_version", &output.schema_version.0.to_string());
    push_field(&mut canonical, "formula_version", &output.formula_version.0.to_string());
    push_text(&mut canonical, "policy_fingerprint", &output.policy_fingerprint);

    let impact = &output.economic_impact;
    push_f64(&mut canonical, "economic_impact.value", impact.value);
    push_f64(
        &mut canonical,
        "economic_impact.brand_consistency",
        impact.breakdown.brand_consistency,
    );
    push_f64(
        &mut canonical,
        "economic_impact.operational_efficiency",
        impact.breakdown.operational_efficiency,
    );
    push_f64(
        &mut canonical,
        "economic_impact.legal_compliance",
        impact.breakdown.legal_compliance,
    );

    push_f64(
        &mut canonical,
        "efficiency_gains.hours_per_year",
        output.efficiency_gains.hours_per_year,
    );
    push_f64(
        &mut canonical,
        "efficiency_gains.cost_savings",
        output.efficiency_gains.cost_savings,
    );

    let risk = &output.risk_mitigation;
    push_field(&mut canonical, "risk_mitigation.score", &risk.score.to_string());
    push_field(
        &mut canonical,
        "risk_mitigation.factors",
        &risk.factors.len().to_string(),
    );
    for factor in &risk.factors {
        push_text(&mut canonical, "risk_mitigation.factor", factor);
    }
    sha256_hex(canonical.as_bytes())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(64);
    for b in digest {
        let _ = write!(out, "{b:02x}");
    }
    out
}

fn push_field(buf: &mut String, key: &str, value: &str) {
    buf.push('|');
    buf.push_str(key);
    buf.push('=');
    buf.push_str(value);
}

fn push_f64(buf: &mut String, key: &str, value: f64) {
    push_field(buf, key, &format!("{:016x}", value.to_bits()));
}

fn push_text(buf: &mut String, key: &str, value: &str) {
    push_field(buf, key, &format!("{}:{}", value.len(), value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::{calculate, ValuationPolicy};
    use brandfonts_kernel_contracts::FormulaVersion;

    fn input(industry: &str) -> CalculationInput {
        CalculationInput::v1(10, 100, 75_000.0, industry.to_string()).unwrap()
    }

    #[test]
    fn at_fingerprint_01_sha256_hex_matches_known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn at_fingerprint_02_input_fingerprint_is_stable_and_field_sensitive() {
        let a = input_fingerprint(&input("technology"));
        assert_eq!(a, input_fingerprint(&input("technology")));
        assert_eq!(a.len(), 64);
        assert_ne!(a, input_fingerprint(&input("retail")));

        let mut salary = input("technology");
        salary.average_salary = 75_000.000_000_1;
        assert_ne!(a, input_fingerprint(&salary));
    }

    #[test]
    fn at_fingerprint_03_output_fingerprint_tracks_formula_version() {
        let out = calculate(&input("technology")).unwrap();
        let original = output_fingerprint(&out);
        assert_eq!(original, output_fingerprint(&out.clone()));

        let mut relabeled = out.clone();
        relabeled.formula_version.0 += 1;
        assert_ne!(original, output_fingerprint(&relabeled));

        let mut other_policy = out;
        other_policy.policy_fingerprint = "0".repeat(64);
        assert_ne!(original, output_fingerprint(&other_policy));
    }

    #[test]
    fn at_fingerprint_04_policy_fingerprint_separates_same_version_constants() {
        let v1 = policy_fingerprint(&ValuationPolicy::mvp_v1());
        assert_eq!(v1, policy_fingerprint(&ValuationPolicy::mvp_v1()));

        let mut a = ValuationPolicy::mvp_v1();
        a.formula_version = FormulaVersion(2);
        a.unit_brand_value = 1_500.0;
        let mut b = a.clone();
        b.unit_brand_value = 9_000.0;
        assert_ne!(policy_fingerprint(&a), policy_fingerprint(&b));
        assert_ne!(policy_fingerprint(&a), v1);

        let mut reordered = a.clone();
        reordered.risk_factors.reverse();
        assert_ne!(policy_fingerprint(&a), policy_fingerprint(&reordered));
    }
}
