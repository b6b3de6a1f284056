#![forbid(unsafe_code)]

use serde::Serialize;
use tracing::{debug, warn};

use brandfonts_engines::fingerprint::{input_fingerprint, output_fingerprint};
use brandfonts_kernel_contracts::ledger::ValuationRecordId;
use brandfonts_storage::repo::ValuationLedgerRepo;

use crate::valuation_wiring::ValuationEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReplayDriftKind {
    InputFingerprintMismatch,
    RecalculationRefused,
    OutputFingerprintMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayDrift {
    pub record_id: ValuationRecordId,
    pub kind: ReplayDriftKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReplayReport {
    pub checked: usize,
    pub skipped_other_versions: usize,
    /// Same formula version, different constants.
    pub skipped_other_policies: usize,
    pub drifted: Vec<ReplayDrift>,
}

impl AuditReplayReport {
    pub fn is_clean(&self) -> bool {
        self.drifted.is_empty()
    }
}

/// Recomputes every ledger row produced under the engine's formula version and
/// policy, and reports rows whose stored figures no longer reproduce bit for bit.
/// Rows from other formula versions or other policies are counted and skipped.
pub fn replay_audit<R, E>(repo: &R, engine: &E) -> AuditReplayReport
where
    R: ValuationLedgerRepo,
    E: ValuationEngine,
{
    let version = engine.formula_version();
    let mut report = AuditReplayReport::default();

    for row in repo.valuation_rows() {
        if row.formula_version != version {
            report.skipped_other_versions += 1;
            continue;
        }
        if row.policy_fingerprint != engine.policy_fingerprint() {
            debug!(
                record_id = row.record_id.0,
                formula_version = version.0,
                policy = %row.policy_fingerprint,
                "replay skipped row from another policy"
            );
            report.skipped_other_policies += 1;
            continue;
        }
        report.checked += 1;

        let kind = if input_fingerprint(&row.input) != row.input_fingerprint {
            Some(ReplayDriftKind::InputFingerprintMismatch)
        } else {
            match engine.calculate(&row.input) {
                Err(_) => Some(ReplayDriftKind::RecalculationRefused),
                Ok(out) if output_fingerprint(&out) != row.output_fingerprint => {
                    Some(ReplayDriftKind::OutputFingerprintMismatch)
                }
                Ok(_) => None,
            }
        };

        if let Some(kind) = kind {
            warn!(
                record_id = row.record_id.0,
                company = row.company_schema_name.as_str(),
                formula_version = version.0,
                ?kind,
                "valuation replay drift"
            );
            report.drifted.push(ReplayDrift {
                record_id: row.record_id,
                kind,
            });
        }
    }
    report
}
