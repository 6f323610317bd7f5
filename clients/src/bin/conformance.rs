//! `calculus-conformance`: Runs the prime calculus conformance suite.
//!
//! Checks, under every configured operator:
//! - Syntax (round trip, error positions) and typing (kinds, rejections)
//! - Reduction (normal forms, termination measure, strategy independence)
//! - Local confluence and semantic agreement with the lambda model
//! - Canonical fusion triads
//!
//! **Usage:**
//! ```
//! calculus-conformance [--config <file>] [--json] [-v]
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{ArgAction, Parser};
use prime_calculus_conformance::{run_all, Severity, SuiteConfig};

/// Run the prime calculus conformance suite.
#[derive(Parser)]
#[command(
    name = "calculus-conformance",
    about = "Validate the prime calculus against its conformance corpus"
)]
struct Args {
    /// TOML file with suite settings (`operators`, `[engine]`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit the report as JSON.
    #[arg(long)]
    json: bool,

    /// Raise log verbosity (repeatable).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    prime_calculus_clients::init_tracing(args.verbose);

    let config: SuiteConfig = prime_calculus_clients::load_config(args.config.as_deref())?;
    let report = run_all(&config)?;

    if args.json {
        println!("{}", report.to_json()?);
        if !report.all_passed() {
            process::exit(1);
        }
        return Ok(());
    }

    println!("Prime Calculus Conformance Report");
    println!("=================================");
    println!();

    for result in &report.results {
        let status = match result.severity {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        };
        println!("[{}] {}: {}", status, result.validator, result.message);
        for detail in &result.details {
            println!("       {}", detail);
        }
    }

    let failed = report.failure_count();
    println!();
    println!(
        "Summary: {} passed, {} warnings, {} failed",
        report.count(Severity::Pass),
        report.count(Severity::Warning),
        failed
    );

    if failed > 0 {
        eprintln!("Conformance FAILED: {} check(s) did not pass.", failed);
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
