//! Sonda - command line runner
//!
//! Runs the echo and GitHub suites against the live services and prints the
//! textual report. Exit code is 0 only when every check passed.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use sonda::suites;
use sonda_application::{FixtureRunner, HttpClient};
use sonda_infrastructure::{ReqwestHttpClient, Settings, write_report};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = Settings::from_env();
    let client: Arc<dyn HttpClient> = match ReqwestHttpClient::new(settings) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            eprintln!("failed to initialize HTTP client: {err}");
            return ExitCode::FAILURE;
        }
    };

    let roots = [
        suites::echo::suite(Arc::clone(&client)),
        suites::github::suite(client),
    ];
    let report = FixtureRunner::new().run(&roots).await;
    tracing::info!(
        run = %report.id,
        passed = report.passed,
        failed = report.failed,
        skipped = report.skipped,
        "run finished"
    );

    if let Err(err) = write_report(&report, &mut io::stdout()) {
        eprintln!("failed to write report: {err}");
        return ExitCode::FAILURE;
    }

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
