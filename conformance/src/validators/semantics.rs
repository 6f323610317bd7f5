//! Semantic agreement validator.
//!
//! The reduction engine and the lambda denotation must agree on every
//! well-typed fixture, under every operator.

use anyhow::Result;

use super::detail;
use crate::report::{ConformanceReport, TestResult};
use crate::tests::fixtures;
use crate::SuiteConfig;

/// Validates operational/denotational agreement.
///
/// # Errors
///
/// Returns an error if a fixture does not parse.
pub fn validate(config: &SuiteConfig) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    for &operator in &config.operators {
        let semantics = config.engine_for(operator).semantics();
        let mut failures = Vec::new();
        let (mut agreed, mut lambda_steps) = (0usize, 0usize);
        for fixture in fixtures::well_typed() {
            let term = fixtures::parse(fixture.name, fixture.source)?;
            match semantics.verify_semantic_equivalence(&term) {
                Ok(agreement) => {
                    agreed += 1;
                    lambda_steps += agreement.denotation.steps;
                }
                Err(err) => failures.push(detail(operator, fixture.name, &err)),
            }
        }
        tracing::debug!(%operator, agreed, lambda_steps, "semantic agreement checked");
        report.push(TestResult::from_failures(
            "semantics/agreement",
            format!("{operator}: {agreed} fixtures agree ({lambda_steps} evaluation steps)"),
            format!("{operator}: reduction and denotation diverge"),
            failures,
        ));
    }
    Ok(report)
}
