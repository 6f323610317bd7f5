//! Equivalence validator.
//!
//! Checks the documented verdicts under the expectation operator, and that
//! operational and denotational equivalence coincide on every pair under
//! every configured operator.

use anyhow::Result;

use crate::report::{ConformanceReport, TestResult};
use crate::tests::fixtures::{self, EQUIVALENCE_PAIRS, EXPECTATION_OPERATOR};
use crate::SuiteConfig;

/// Validates term equivalence.
///
/// # Errors
///
/// Returns an error if a fixture does not parse.
pub fn validate(config: &SuiteConfig) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    let engine = config.engine_for(EXPECTATION_OPERATOR).engine();
    let mut failures = Vec::new();
    for pair in EQUIVALENCE_PAIRS {
        let left = fixtures::parse(pair.left, pair.left)?;
        let right = fixtures::parse(pair.right, pair.right)?;
        match engine.equivalent(&left, &right) {
            Ok(verdict) if verdict == pair.equivalent => {}
            Ok(verdict) => failures.push(format!(
                "{} ~ {}: got {verdict}, expected {}",
                pair.left, pair.right, pair.equivalent
            )),
            Err(err) => failures.push(format!("{} ~ {}: {err}", pair.left, pair.right)),
        }
    }
    report.push(TestResult::from_failures(
        "semantics/equivalence",
        format!(
            "{} equivalence verdicts hold under {EXPECTATION_OPERATOR}",
            EQUIVALENCE_PAIRS.len()
        ),
        "unexpected equivalence verdicts",
        failures,
    ));

    for &operator in &config.operators {
        let engine_config = config.engine_for(operator);
        let (engine, semantics) = (engine_config.engine(), engine_config.semantics());
        let mut failures = Vec::new();
        for pair in EQUIVALENCE_PAIRS {
            let left = fixtures::parse(pair.left, pair.left)?;
            let right = fixtures::parse(pair.right, pair.right)?;
            let verdicts = engine
                .equivalent(&left, &right)
                .and_then(|op| Ok((op, semantics.equivalent(&left, &right)?)));
            match verdicts {
                Ok((op, den)) if op == den => {}
                Ok((op, den)) => failures.push(format!(
                    "{operator}: {} ~ {}: operational {op}, denotational {den}",
                    pair.left, pair.right
                )),
                Err(err) => failures.push(format!("{operator}: {} ~ {}: {err}", pair.left, pair.right)),
            }
        }
        report.push(TestResult::from_failures(
            "semantics/equivalence",
            format!("{operator}: operational and denotational equivalence coincide"),
            format!("{operator}: equivalence notions disagree"),
            failures,
        ));
    }

    Ok(report)
}
