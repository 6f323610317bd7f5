//! Confluence validator.
//!
//! Explores every reduction path of the built-in overlapping-redex terms
//! and of each fixture, under each operator.

use anyhow::Result;
use prime_calculus::reduction::verify::{confluence_of, test_local_confluence};

use super::detail;
use crate::report::{ConformanceReport, TestResult};
use crate::tests::fixtures;
use crate::SuiteConfig;

/// Validates local confluence.
///
/// # Errors
///
/// Returns an error if a fixture does not parse.
pub fn validate(config: &SuiteConfig) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    for &operator in &config.operators {
        let engine = config.engine_for(operator).engine();

        match test_local_confluence(&engine) {
            Ok(reports) => {
                let paths: u64 = reports.iter().map(|r| r.paths).sum();
                report.push(TestResult::pass(
                    "confluence/overlapping-redexes",
                    format!(
                        "{operator}: {} overlapping-redex terms, {paths} paths, one normal form each",
                        reports.len()
                    ),
                ));
            }
            Err(err) => report.push(TestResult::fail(
                "confluence/overlapping-redexes",
                format!("{operator}: {err}"),
            )),
        }

        let mut failures = Vec::new();
        let mut paths = 0u64;
        for fixture in fixtures::well_typed() {
            let term = fixtures::parse(fixture.name, fixture.source)?;
            match confluence_of(&engine, &term) {
                Ok(confluence) => paths += confluence.paths,
                Err(err) => failures.push(detail(operator, fixture.name, &err)),
            }
        }
        report.push(TestResult::from_failures(
            "confluence/fixtures",
            format!("{operator}: every fixture has a unique normal form ({paths} paths)"),
            format!("{operator}: fixtures with diverging reductions"),
            failures,
        ));
    }
    Ok(report)
}
