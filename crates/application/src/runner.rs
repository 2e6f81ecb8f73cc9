//! Fixture chain runner.
//!
//! Walks a tree of Scopes depth-first and strictly sequentially: a Scope's
//! setup step runs to completion before its checks, its checks before its
//! children, and sibling Scopes in registration order. A failed or timed-out
//! setup step marks the Scope's own checks and its entire subtree as skipped
//! without running any descendant setup.
//!
//! Failure policy: checks within a Scope are collect-all by default (every
//! check runs and is recorded even after one fails); `with_stop_on_failure`
//! switches to fail-fast per Scope.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use sonda_domain::{
    CheckFailure, CheckReport, FailureKind, Outcome, RunReport, ScopeReport, SkipReason,
};

use crate::ports::CancellationToken;
use crate::scope::{Scope, Vars};

/// Default per-step timeout.
const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes Scope trees and produces a `RunReport`.
#[derive(Debug, Clone)]
pub struct FixtureRunner {
    step_timeout: Duration,
    stop_on_failure: bool,
    cancel: CancellationToken,
}

impl Default for FixtureRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureRunner {
    /// Creates a runner with the default timeout and collect-all policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            step_timeout: DEFAULT_STEP_TIMEOUT,
            stop_on_failure: false,
            cancel: CancellationToken::new(),
        }
    }

    /// Sets the per-step timeout applied to setup steps and checks.
    #[must_use]
    pub const fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    /// Switches to fail-fast within each Scope.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Uses an externally owned cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Returns a handle that can cancel this run from another task.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the given root Scopes in order and aggregates the results.
    pub async fn run(&self, roots: &[Scope]) -> RunReport {
        let start = Instant::now();
        let mut scopes = Vec::new();
        let inherited = Vars::new();

        for root in roots {
            self.run_scope(root, None, &inherited, &mut scopes).await;
        }

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;
        RunReport::new(scopes, duration_ms)
    }

    fn run_scope<'a>(
        &'a self,
        scope: &'a Scope,
        parent_path: Option<&'a str>,
        inherited: &'a Vars,
        out: &'a mut Vec<ScopeReport>,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            let path = join_path(parent_path, scope.name());

            if self.cancel.is_cancelled() {
                skip_subtree(scope, parent_path, SkipReason::Cancelled, out);
                return;
            }

            let mut report = ScopeReport::new(path.clone());
            let mut vars = inherited.clone();

            if let Some(setup) = scope.setup() {
                tracing::debug!(scope = %path, "running setup step");
                match tokio::time::timeout(self.step_timeout, setup(inherited.clone())).await {
                    Ok(Ok(captured)) => vars.extend(captured),
                    Ok(Err(err)) => {
                        tracing::warn!(scope = %path, error = %err, "setup step failed");
                        report.push(CheckReport::new(
                            "setup",
                            Outcome::failed(err.failure_kind(), CheckFailure::new(err.to_string())),
                        ));
                        self.abandon_scope(scope, &path, report, out);
                        return;
                    }
                    Err(_elapsed) => {
                        tracing::warn!(scope = %path, "setup step timed out");
                        report.push(CheckReport::new(
                            "setup",
                            Outcome::failed(
                                FailureKind::Timeout,
                                CheckFailure::new(format!(
                                    "setup step exceeded {} ms",
                                    self.step_timeout.as_millis()
                                )),
                            ),
                        ));
                        self.abandon_scope(scope, &path, report, out);
                        return;
                    }
                }
            }

            for check in scope.checks() {
                let started = Instant::now();
                let result = check.run(&vars);
                let elapsed = started.elapsed();

                let outcome = match result {
                    // Checks are synchronous; the bound is enforced after the fact.
                    Ok(()) if elapsed > self.step_timeout => Outcome::failed(
                        FailureKind::Timeout,
                        CheckFailure::new(format!(
                            "check exceeded {} ms",
                            self.step_timeout.as_millis()
                        )),
                    ),
                    Ok(()) => Outcome::Passed,
                    Err(failure) => Outcome::failed(FailureKind::Assertion, failure),
                };

                let failed = outcome.is_failed();
                tracing::debug!(scope = %path, check = check.description(), passed = !failed);
                report.push(CheckReport::new(check.description(), outcome));

                if failed && self.stop_on_failure {
                    break;
                }
            }

            if !report.checks.is_empty() {
                out.push(report);
            }

            for child in scope.children() {
                self.run_scope(child, Some(&path), &vars, out).await;
            }
        })
    }

    /// Records a Scope whose setup failed: its own checks and every
    /// descendant Scope are skipped, and no descendant setup runs.
    fn abandon_scope(
        &self,
        scope: &Scope,
        path: &str,
        mut report: ScopeReport,
        out: &mut Vec<ScopeReport>,
    ) {
        for check in scope.checks() {
            report.push(CheckReport::new(
                check.description(),
                Outcome::skipped(SkipReason::SetupFailed),
            ));
        }
        out.push(report);

        for child in scope.children() {
            skip_subtree(child, Some(path), SkipReason::SetupFailed, out);
        }
    }
}

fn join_path(parent: Option<&str>, name: &str) -> String {
    parent.map_or_else(|| name.to_string(), |p| format!("{p} / {name}"))
}

/// Marks every check in the subtree as skipped without running anything.
fn skip_subtree(
    scope: &Scope,
    parent_path: Option<&str>,
    reason: SkipReason,
    out: &mut Vec<ScopeReport>,
) {
    let path = join_path(parent_path, scope.name());

    if !scope.checks().is_empty() {
        let mut report = ScopeReport::new(path.clone());
        for check in scope.checks() {
            report.push(CheckReport::new(
                check.description(),
                Outcome::skipped(reason),
            ));
        }
        out.push(report);
    }

    for child in scope.children() {
        skip_subtree(child, Some(&path), reason, out);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::SetupError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    fn record(log: &Log, entry: impl Into<String>) {
        #[allow(clippy::expect_used)]
        log.lock().expect("log poisoned").push(entry.into());
    }

    fn entries(log: &Log) -> Vec<String> {
        #[allow(clippy::expect_used)]
        log.lock().expect("log poisoned").clone()
    }

    fn logging_scope(name: &str, log: &Log) -> Scope {
        let setup_log = log.clone();
        let setup_name = name.to_string();
        let check_log = log.clone();
        let check_name = name.to_string();

        Scope::new(name)
            .with_setup(move |_vars| {
                let log = setup_log.clone();
                let name = setup_name.clone();
                async move {
                    record(&log, format!("setup:{name}"));
                    Ok(Vars::new())
                }
            })
            .with_check("runs", move |_vars| {
                record(&check_log, format!("check:{check_name}"));
                Ok(())
            })
    }

    #[tokio::test]
    async fn test_depth_first_sequential_order() {
        let log: Log = Arc::default();
        let child = logging_scope("child", &log);
        let root_a = logging_scope("a", &log).with_child(child);
        let root_b = logging_scope("b", &log);

        let report = FixtureRunner::new().run(&[root_a, root_b]).await;

        assert!(report.all_passed());
        assert_eq!(
            entries(&log),
            vec!["setup:a", "check:a", "setup:child", "check:child", "setup:b", "check:b"]
        );
    }

    #[tokio::test]
    async fn test_scope_paths_in_report() {
        let log: Log = Arc::default();
        let tree = logging_scope("outer", &log).with_child(logging_scope("inner", &log));

        let report = FixtureRunner::new().run(&[tree]).await;
        let paths: Vec<_> = report.scopes.iter().map(|s| s.path.clone()).collect();
        assert_eq!(paths, vec!["outer", "outer / inner"]);
    }

    #[tokio::test]
    async fn test_vars_flow_parent_to_descendants_only() {
        let root = Scope::new("parent")
            .with_setup(|_vars| async {
                let mut vars = Vars::new();
                vars.insert("user".to_string(), json!({"login": "aperdomob"}));
                Ok(vars)
            })
            .with_child(Scope::new("child").with_check("sees parent var", |vars| {
                sonda_domain::expect_eq(
                    "user.login",
                    vars.get("user").and_then(|u| u.pointer("/login")),
                    &json!("aperdomob"),
                )
            }));

        let sibling = Scope::new("sibling").with_check("does not see cousin var", |vars| {
            if vars.contains_key("user") {
                Err(CheckFailure::new("var leaked across sibling scopes"))
            } else {
                Ok(())
            }
        });

        let report = FixtureRunner::new().run(&[root, sibling]).await;
        assert!(report.all_passed(), "{report:?}");
    }

    #[tokio::test]
    async fn test_setup_failure_skips_subtree() {
        let log: Log = Arc::default();
        let grandchild = logging_scope("grandchild", &log);
        let child = logging_scope("child", &log).with_child(grandchild);
        let root = Scope::new("root")
            .with_setup(|_vars| async { Err(SetupError::Other("boom".to_string())) })
            .with_check("own check", |_vars| Ok(()))
            .with_child(child);

        let report = FixtureRunner::new().run(&[root]).await;

        // No descendant setup or check ever ran.
        assert_eq!(entries(&log), Vec::<String>::new());

        let root_report = &report.scopes[0];
        assert_eq!(root_report.path, "root");
        assert_eq!(root_report.checks[0].description, "setup");
        assert!(root_report.checks[0].outcome.is_failed());
        assert!(root_report.checks[1].outcome.is_skipped());

        for scope in &report.scopes[1..] {
            for check in &scope.checks {
                assert_eq!(
                    check.outcome,
                    Outcome::skipped(SkipReason::SetupFailed),
                    "{} must be skipped, never passed",
                    scope.path
                );
            }
        }
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 3);
        assert!(!report.all_passed());
    }

    #[tokio::test]
    async fn test_setup_timeout_fails_fast() {
        let log: Log = Arc::default();
        let child = logging_scope("child", &log);
        let root = Scope::new("slow")
            .with_setup(|_vars| async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(Vars::new())
            })
            .with_check("never runs", |_vars| Ok(()))
            .with_child(child);

        let runner = FixtureRunner::new().with_step_timeout(Duration::from_millis(20));
        let report = runner.run(&[root]).await;

        let setup = &report.scopes[0].checks[0];
        assert_eq!(setup.description, "setup");
        assert!(matches!(
            setup.outcome,
            Outcome::Failed { kind: FailureKind::Timeout, .. }
        ));
        assert_eq!(entries(&log), Vec::<String>::new());
        assert!(!report.all_passed());
    }

    #[tokio::test]
    async fn test_cancelled_run_skips_everything() {
        let log: Log = Arc::default();
        let roots = [logging_scope("a", &log), logging_scope("b", &log)];

        let runner = FixtureRunner::new();
        runner.cancellation_token().cancel();
        let report = runner.run(&roots).await;

        assert_eq!(entries(&log), Vec::<String>::new());
        assert_eq!(report.skipped, report.total);
        for scope in &report.scopes {
            for check in &scope.checks {
                assert_eq!(check.outcome, Outcome::skipped(SkipReason::Cancelled));
            }
        }
    }

    #[tokio::test]
    async fn test_cancel_mid_run_skips_later_siblings() {
        let log: Log = Arc::default();
        let runner = FixtureRunner::new();
        let token = runner.cancellation_token();

        let first_log = log.clone();
        let first = Scope::new("first")
            .with_setup(move |_vars| {
                let token = token.clone();
                let log = first_log.clone();
                async move {
                    record(&log, "setup:first");
                    token.cancel();
                    Ok(Vars::new())
                }
            })
            .with_check("still runs", |_vars| Ok(()));
        let second = logging_scope("second", &log);

        let report = runner.run(&[first, second]).await;

        assert_eq!(entries(&log), vec!["setup:first"]);
        assert_eq!(report.passed, 1);
        assert_eq!(report.skipped, 1);
    }

    #[tokio::test]
    async fn test_collect_all_is_default() {
        let scope = Scope::new("s")
            .with_check("fails", |_vars| Err(CheckFailure::new("nope")))
            .with_check("still recorded", |_vars| Ok(()));

        let report = FixtureRunner::new().run(&[scope]).await;
        assert_eq!(report.scopes[0].checks.len(), 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.passed, 1);
    }

    #[tokio::test]
    async fn test_stop_on_failure_truncates_scope() {
        let scope = Scope::new("s")
            .with_check("fails", |_vars| Err(CheckFailure::new("nope")))
            .with_check("not reached", |_vars| Ok(()));

        let report = FixtureRunner::new()
            .with_stop_on_failure(true)
            .run(&[scope])
            .await;
        assert_eq!(report.scopes[0].checks.len(), 1);
    }

    #[tokio::test]
    async fn test_slow_check_is_reported_as_timeout() {
        let scope = Scope::new("s").with_check("busy", |_vars| {
            std::thread::sleep(Duration::from_millis(50));
            Ok(())
        });

        let runner = FixtureRunner::new().with_step_timeout(Duration::from_millis(10));
        let report = runner.run(&[scope]).await;
        assert!(matches!(
            report.scopes[0].checks[0].outcome,
            Outcome::Failed { kind: FailureKind::Timeout, .. }
        ));
    }
}
