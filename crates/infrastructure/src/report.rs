//! Text report writer.
//!
//! Renders a `RunReport` as a line-oriented report: one line per check with
//! its Scope path, expected/actual detail for failures, and a summary footer.

use std::io::{self, Write};

use chrono::{SecondsFormat, Utc};
use sonda_domain::{Outcome, RunReport};

/// Writes the full textual report for a run.
///
/// # Errors
///
/// Returns any I/O error raised by the writer.
pub fn write_report<W: Write>(report: &RunReport, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "sonda run {} at {}",
        report.id,
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    )?;
    writeln!(out)?;

    for scope in &report.scopes {
        for check in &scope.checks {
            match &check.outcome {
                Outcome::Passed => {
                    writeln!(out, "PASS  {} :: {}", scope.path, check.description)?;
                }
                Outcome::Failed { kind, failure } => {
                    writeln!(
                        out,
                        "FAIL  {} :: {} [{}]",
                        scope.path,
                        check.description,
                        kind.label()
                    )?;
                    writeln!(out, "      error:    {}", failure.message)?;
                    if let Some(expected) = &failure.expected {
                        writeln!(out, "      expected: {expected}")?;
                    }
                    if let Some(actual) = &failure.actual {
                        writeln!(out, "      actual:   {actual}")?;
                    }
                }
                Outcome::Skipped { reason } => {
                    writeln!(
                        out,
                        "SKIP  {} :: {} ({})",
                        scope.path,
                        check.description,
                        reason.label()
                    )?;
                }
            }
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{} checks: {} passed, {} failed, {} skipped ({} ms)",
        report.total, report.passed, report.failed, report.skipped, report.duration_ms
    )
}
