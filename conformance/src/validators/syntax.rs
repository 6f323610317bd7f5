//! Syntax validator.
//!
//! Every fixture must parse, print back to its own source, and parse again
//! to the same term. Malformed inputs must fail with the documented byte
//! offset.

use prime_calculus::{parse_term, CalculusError};

use crate::report::{ConformanceReport, TestResult};
use crate::tests::fixtures::{self, ILL_TYPED, MALFORMED};

/// Validates the textual notation.
pub fn validate() -> ConformanceReport {
    let mut report = ConformanceReport::new();
    validate_round_trip(&mut report);
    validate_errors(&mut report);
    report
}

fn validate_round_trip(report: &mut ConformanceReport) {
    let sources = fixtures::well_typed()
        .map(|f| f.source)
        .chain(ILL_TYPED.iter().map(|f| f.source));
    let mut failures = Vec::new();
    let mut checked = 0usize;
    for source in sources {
        checked += 1;
        let term = match parse_term(source) {
            Ok(term) => term,
            Err(err) => {
                failures.push(format!("{source}: {err}"));
                continue;
            }
        };
        let printed = term.to_string();
        if printed != source {
            failures.push(format!("{source}: printed as {printed}"));
        } else if parse_term(&printed).ok().as_ref() != Some(&term) {
            failures.push(format!("{source}: reparse differs"));
        }
    }
    report.push(TestResult::from_failures(
        "syntax/round-trip",
        format!("{checked} fixtures parse and print back to their source"),
        format!("{} fixtures do not round-trip", failures.len()),
        failures,
    ));
}

fn validate_errors(report: &mut ConformanceReport) {
    let mut failures = Vec::new();
    for case in MALFORMED {
        match parse_term(case.source) {
            Err(CalculusError::Parse { position, .. }) if position == case.position => {}
            Err(CalculusError::Parse { position, message }) => failures.push(format!(
                "{:?}: error at {position} ({message}), expected {}",
                case.source, case.position
            )),
            Err(other) => failures.push(format!("{:?}: not a parse error: {other}", case.source)),
            Ok(term) => failures.push(format!("{:?}: accepted as {term}", case.source)),
        }
    }
    report.push(TestResult::from_failures(
        "syntax/errors",
        format!("{} malformed inputs rejected at the expected offset", MALFORMED.len()),
        "malformed inputs not rejected as expected",
        failures,
    ));
}
