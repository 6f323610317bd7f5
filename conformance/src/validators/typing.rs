//! Typing validator.
//!
//! Checks the inferred kind of every well-typed fixture, that the judgment
//! is stable under an annotation of its own type, and that ill-typed
//! fixtures fail with the expected error.

use anyhow::Result;
use prime_calculus::{CalculusError, TypeChecker, TypingContext};

use crate::report::{ConformanceReport, TestResult};
use crate::tests::fixtures::{self, ILL_TYPED};

/// Validates the type checker against the fixture corpus.
///
/// # Errors
///
/// Returns an error if a fixture does not parse.
pub fn validate() -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let checker = TypeChecker::new();

    let mut failures = Vec::new();
    for fixture in fixtures::well_typed() {
        let term = fixtures::parse(fixture.name, fixture.source)?;
        match checker.check(&term, &TypingContext::new()) {
            Ok(judgment) if judgment.ty().kind() == fixture.kind => {
                let annotated = TypingContext::new().with(&term, judgment.ty().clone());
                if let Err(err) = checker.check(&term, &annotated) {
                    failures.push(format!("{}: rejected under its own annotation: {err}", fixture.name));
                }
            }
            Ok(judgment) => failures.push(format!(
                "{}: inferred {}, expected a {} type",
                fixture.name,
                judgment.ty(),
                fixture.kind
            )),
            Err(err) => failures.push(format!("{}: {err}", fixture.name)),
        }
    }
    report.push(TestResult::from_failures(
        "typing/fixtures",
        "all well-typed fixtures check with their expected kind",
        "well-typed fixtures rejected or mistyped",
        failures,
    ));

    let mut failures = Vec::new();
    for fixture in ILL_TYPED {
        let term = fixtures::parse(fixture.name, fixture.source)?;
        match checker.check(&term, &TypingContext::new()) {
            Err(err) if error_kind(&err) == fixture.error => {}
            Err(err) => failures.push(format!(
                "{}: expected {}, got {err}",
                fixture.name, fixture.error
            )),
            Ok(judgment) => failures.push(format!("{}: accepted as {}", fixture.name, judgment.ty())),
        }
    }
    report.push(TestResult::from_failures(
        "typing/rejections",
        format!("{} ill-typed fixtures rejected", ILL_TYPED.len()),
        "ill-typed fixtures not rejected as expected",
        failures,
    ));

    Ok(report)
}

fn error_kind(err: &CalculusError) -> &'static str {
    match err {
        CalculusError::TypeMismatch { .. } => "type-mismatch",
        CalculusError::IllFormedFusion { .. } => "ill-formed-fusion",
        _ => "other",
    }
}
