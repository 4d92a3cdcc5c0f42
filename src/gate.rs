//! Severity gate deciding the process exit status.

use crate::model::{Threshold, Vulnerability};

/// Exit codes for CI integration
pub mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Pass,
    /// At least one vulnerability met the threshold.
    Fail(Threshold),
}

impl GateOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, GateOutcome::Pass)
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            GateOutcome::Pass => exit_codes::SUCCESS,
            GateOutcome::Fail(_) => exit_codes::FAILURE,
        }
    }

    /// The `[PASS]` / `[FAIL]` line printed after the summary.
    pub fn status_line(&self) -> String {
        match self {
            GateOutcome::Pass => "[PASS] Scan complete.".to_string(),
            GateOutcome::Fail(threshold) => format!(
                "[FAIL] Found vulnerabilities at or above {} severity.",
                threshold
            ),
        }
    }
}

/// Fails if any vulnerability is at or above `threshold`; passes when there is none.
pub fn evaluate(vulns: &[Vulnerability], threshold: Option<Threshold>) -> GateOutcome {
    let Some(threshold) = threshold else {
        return GateOutcome::Pass;
    };

    match vulns.iter().find(|v| threshold.is_met_by(v.severity)) {
        Some(vuln) => {
            tracing::debug!(id = %vuln.id, severity = %vuln.severity, %threshold, "gate breached");
            GateOutcome::Fail(threshold)
        }
        None => GateOutcome::Pass,
    }
}
