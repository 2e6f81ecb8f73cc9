//! Run outcomes and report aggregation.
//!
//! Every check ends in exactly one `Outcome`; outcomes are grouped per Scope
//! path and aggregated into a `RunReport` that drives the process exit code.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::check::CheckFailure;

/// Classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Transport, DNS, or TLS failure.
    Network,
    /// A setup step or check exceeded its time budget.
    Timeout,
    /// Missing or invalid credential.
    Auth,
    /// Expected vs actual mismatch.
    Assertion,
    /// Anything else (invalid URL, invalid body, adapter errors).
    Other,
}

impl FailureKind {
    /// Returns a short label for report output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Auth => "auth",
            Self::Assertion => "assertion",
            Self::Other => "error",
        }
    }
}

/// Why a check was skipped without running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// This Scope's setup, or an ancestor's, failed; the check was never attempted.
    SetupFailed,
    /// The run was cancelled before this Scope started.
    Cancelled,
}

impl SkipReason {
    /// Returns a short label for report output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SetupFailed => "setup failure",
            Self::Cancelled => "cancelled",
        }
    }
}

/// The outcome of one check or setup step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The check passed.
    Passed,
    /// The check or setup step failed.
    Failed {
        /// Failure classification.
        kind: FailureKind,
        /// Details, including expected/actual where available.
        failure: CheckFailure,
    },
    /// The check never ran.
    Skipped {
        /// Why the check was skipped.
        reason: SkipReason,
    },
}

impl Outcome {
    /// Creates a failed outcome.
    #[must_use]
    pub const fn failed(kind: FailureKind, failure: CheckFailure) -> Self {
        Self::Failed { kind, failure }
    }

    /// Creates a skipped outcome.
    #[must_use]
    pub const fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    /// Returns true if the outcome is a pass.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns true if the outcome is a failure.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns true if the outcome is a skip.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Result of a single named check within a Scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Check description as registered.
    pub description: String,
    /// What happened.
    pub outcome: Outcome,
}

impl CheckReport {
    /// Creates a new check report.
    #[must_use]
    pub fn new(description: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            description: description.into(),
            outcome,
        }
    }
}

/// All check results for one Scope, identified by its path from the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeReport {
    /// Slash-separated Scope path (e.g. `"given a user / when get user"`).
    pub path: String,
    /// Check results in registration order.
    pub checks: Vec<CheckReport>,
}

impl ScopeReport {
    /// Creates an empty report for the given path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            checks: Vec::new(),
        }
    }

    /// Appends a check result.
    pub fn push(&mut self, report: CheckReport) {
        self.checks.push(report);
    }
}

/// Aggregated results of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique run identifier.
    pub id: Uuid,
    /// Per-Scope results in execution order.
    pub scopes: Vec<ScopeReport>,
    /// Total number of checks.
    pub total: usize,
    /// Number of passed checks.
    pub passed: usize,
    /// Number of failed checks (including failed setup steps).
    pub failed: usize,
    /// Number of skipped checks.
    pub skipped: usize,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

impl RunReport {
    /// Creates a report, computing the aggregate counters.
    #[must_use]
    pub fn new(scopes: Vec<ScopeReport>, duration_ms: u64) -> Self {
        let mut passed = 0;
        let mut failed = 0;
        let mut skipped = 0;
        for scope in &scopes {
            for check in &scope.checks {
                match &check.outcome {
                    Outcome::Passed => passed += 1,
                    Outcome::Failed { .. } => failed += 1,
                    Outcome::Skipped { .. } => skipped += 1,
                }
            }
        }

        Self {
            id: Uuid::now_v7(),
            scopes,
            total: passed + failed + skipped,
            passed,
            failed,
            skipped,
            duration_ms,
        }
    }

    /// Returns true if every check passed (skips count as not passed).
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }

    /// Returns the pass rate as a percentage.
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            {
                (self.passed as f64 / self.total as f64) * 100.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scope_with(path: &str, outcomes: Vec<Outcome>) -> ScopeReport {
        let mut report = ScopeReport::new(path);
        for (i, outcome) in outcomes.into_iter().enumerate() {
            report.push(CheckReport::new(format!("check {i}"), outcome));
        }
        report
    }

    #[test]
    fn test_outcome_predicates() {
        assert!(Outcome::Passed.is_passed());
        assert!(Outcome::failed(FailureKind::Assertion, CheckFailure::new("boom")).is_failed());
        assert!(Outcome::skipped(SkipReason::SetupFailed).is_skipped());
    }

    #[test]
    fn test_run_report_aggregation() {
        let scopes = vec![
            scope_with("a", vec![Outcome::Passed, Outcome::Passed]),
            scope_with(
                "a / b",
                vec![
                    Outcome::failed(FailureKind::Network, CheckFailure::new("down")),
                    Outcome::skipped(SkipReason::SetupFailed),
                ],
            ),
        ];

        let report = RunReport::new(scopes, 120);
        assert_eq!(report.total, 4);
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 1);
        assert!(!report.all_passed());
        assert_eq!(report.pass_rate(), 50.0);
    }

    #[test]
    fn test_all_passed_requires_no_skips() {
        let report = RunReport::new(
            vec![scope_with(
                "a",
                vec![Outcome::Passed, Outcome::skipped(SkipReason::Cancelled)],
            )],
            10,
        );
        assert!(!report.all_passed());
    }

    #[test]
    fn test_empty_run_passes() {
        let report = RunReport::new(Vec::new(), 0);
        assert!(report.all_passed());
        assert_eq!(report.pass_rate(), 100.0);
    }
}
