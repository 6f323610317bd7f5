//! Canonical fusion triad validator.
//!
//! Known canonical triads under the default weights, structural properties
//! of every triad under the configured weights, and value preservation of
//! `canonicalize` on the fixture corpus.

use anyhow::Result;
use prime_calculus::prime::first_n_primes;
use prime_calculus::FusionCanonicalizer;

use super::detail;
use crate::report::{ConformanceReport, TestResult};
use crate::tests::fixtures::{self, EXPECTATION_OPERATOR};
use crate::SuiteConfig;

/// Targets and their canonical triad under default weights.
const KNOWN: &[(u64, Option<(u64, u64, u64)>)] = &[
    (13, None),
    (19, Some((3, 5, 11))),
    (23, Some((5, 7, 11))),
];

/// Prime targets checked structurally: the 6th through 60th primes.
const TARGET_RANGE: std::ops::Range<usize> = 5..60;

/// Validates the fusion canonicalizer.
///
/// # Errors
///
/// Returns an error if a fixture does not parse.
pub fn validate(config: &SuiteConfig) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    validate_known(&mut report);
    validate_structure(config, &mut report);
    validate_preservation(config, &mut report)?;
    Ok(report)
}

fn validate_known(report: &mut ConformanceReport) {
    let canonicalizer = FusionCanonicalizer::new();
    let mut failures = Vec::new();
    for &(target, expected) in KNOWN {
        match canonicalizer.canonical(target) {
            Ok(found) => {
                let found = found.map(|t| (t.p.get(), t.q.get(), t.r.get()));
                if found != expected {
                    failures.push(format!("{target}: got {found:?}, expected {expected:?}"));
                }
            }
            Err(err) => failures.push(format!("{target}: {err}")),
        }
    }
    if canonicalizer.canonical(21).is_ok() {
        failures.push("21: composite target accepted".to_owned());
    }
    report.push(TestResult::from_failures(
        "canonical/known",
        "canonical triads match under default weights",
        "unexpected canonical triads",
        failures,
    ));
}

fn validate_structure(config: &SuiteConfig, report: &mut ConformanceReport) {
    let canonicalizer = config.engine.canonicalizer();
    let primes = first_n_primes(TARGET_RANGE.end);
    let mut failures = Vec::new();
    let mut decomposable = 0usize;
    for &target in &primes[TARGET_RANGE] {
        let (triads, canonical) = match canonicalizer
            .triads(target)
            .and_then(|all| Ok((all, canonicalizer.canonical(target)?)))
        {
            Ok(found) => found,
            Err(err) => {
                failures.push(format!("{target}: {err}"));
                continue;
            }
        };
        for triad in triads.iter() {
            let distinct_odd = triad.p.is_odd() && triad.p < triad.q && triad.q < triad.r;
            if triad.sum() != target || !distinct_odd {
                failures.push(format!("{target}: bad decomposition {triad}"));
            }
        }
        match canonical {
            Some(triad) if triads.contains(&triad) => decomposable += 1,
            Some(triad) => failures.push(format!("{target}: canonical {triad} not among its triads")),
            None if triads.is_empty() => {}
            None => failures.push(format!("{target}: no canonical triad among {}", triads.len())),
        }
    }
    report.push(TestResult::from_failures(
        "canonical/triads",
        format!(
            "{} targets checked, {decomposable} decomposable, {} cached",
            TARGET_RANGE.len(),
            canonicalizer.cached_targets()
        ),
        "malformed triad decompositions",
        failures,
    ));
}

fn validate_preservation(config: &SuiteConfig, report: &mut ConformanceReport) -> Result<()> {
    let canonicalizer = config.engine.canonicalizer();
    let engine = config.engine_for(EXPECTATION_OPERATOR).engine();
    let mut failures = Vec::new();
    for fixture in fixtures::well_typed() {
        let term = fixtures::parse(fixture.name, fixture.source)?;
        let outcome = canonicalizer.canonicalize(&term).and_then(|canonical| {
            Ok((engine.evaluate(&term)?, engine.evaluate(&canonical)?))
        });
        match outcome {
            Ok((before, after)) if before == after => {}
            Ok((before, after)) => failures.push(format!(
                "{}: {before} became {after} after canonicalization",
                fixture.name
            )),
            Err(err) => failures.push(detail(EXPECTATION_OPERATOR, fixture.name, &err)),
        }
    }
    report.push(TestResult::from_failures(
        "canonical/preservation",
        "canonicalization preserves every fixture's normal form",
        "canonicalization changed normal forms",
        failures,
    ));
    Ok(())
}
