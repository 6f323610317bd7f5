//! Reduction validator.
//!
//! - `reduction/normal-forms`: fixtures reach their documented terminal
//!   term under the expectation operator.
//! - `reduction/measure`: every step strictly decreases the termination
//!   measure, and only FUSE steps leave `term_size` unchanged.
//! - `reduction/strategies`: leftmost-first and rightmost-first agree.

use anyhow::Result;
use prime_calculus::reduction::verify::demonstrate_strong_normalization;
use prime_calculus::{OperatorKind, Rule, Strategy};

use super::detail;
use crate::report::{ConformanceReport, TestResult};
use crate::tests::fixtures::{self, EXPECTATION_OPERATOR};
use crate::SuiteConfig;

/// Share of the step bound above which a trace is reported as a warning.
const STEP_BOUND_WARNING: f64 = 0.9;

/// Validates normalization of the fixture corpus.
///
/// # Errors
///
/// Returns an error if a fixture does not parse.
pub fn validate(config: &SuiteConfig) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    validate_normal_forms(config, &mut report)?;
    for &operator in &config.operators {
        validate_measure(config, operator, &mut report)?;
        validate_strategies(config, operator, &mut report)?;
    }
    Ok(report)
}

fn validate_normal_forms(config: &SuiteConfig, report: &mut ConformanceReport) -> Result<()> {
    let engine = config.engine_for(EXPECTATION_OPERATOR).engine();
    let mut failures = Vec::new();
    for fixture in fixtures::well_typed() {
        let term = fixtures::parse(fixture.name, fixture.source)?;
        match engine.evaluate(&term) {
            Ok(normal) if normal.to_string() == fixture.normal_form => {}
            Ok(normal) => failures.push(format!(
                "{}: reached {normal}, expected {}",
                fixture.name, fixture.normal_form
            )),
            Err(err) => failures.push(detail(EXPECTATION_OPERATOR, fixture.name, &err)),
        }
    }
    report.push(TestResult::from_failures(
        "reduction/normal-forms",
        format!("fixtures reach their expected normal forms under {EXPECTATION_OPERATOR}"),
        format!("unexpected normal forms under {EXPECTATION_OPERATOR}"),
        failures,
    ));
    Ok(())
}

fn validate_measure(
    config: &SuiteConfig,
    operator: OperatorKind,
    report: &mut ConformanceReport,
) -> Result<()> {
    let engine = config.engine_for(operator).engine();
    let bound = engine.max_steps() as f64 * STEP_BOUND_WARNING;
    let mut failures = Vec::new();
    let (mut steps, mut plateaus) = (0usize, 0usize);
    for fixture in fixtures::well_typed() {
        let term = fixtures::parse(fixture.name, fixture.source)?;
        let normalization = match demonstrate_strong_normalization(&engine, &term) {
            Ok(normalization) => normalization,
            Err(err) => {
                failures.push(detail(operator, fixture.name, &err));
                continue;
            }
        };
        for index in normalization.size_plateaus() {
            let rule = normalization.samples()[index].rule;
            if rule != Rule::Fuse {
                failures.push(format!(
                    "{operator}: {}: {rule} step {index} did not shrink the term",
                    fixture.name
                ));
            }
            plateaus += 1;
        }
        let len = normalization.trace().len();
        if len as f64 > bound {
            report.push(TestResult::warn(
                "reduction/measure",
                format!(
                    "{operator}: {} used {len} of {} steps",
                    fixture.name,
                    engine.max_steps()
                ),
            ));
        }
        steps += len;
    }
    report.push(TestResult::from_failures(
        "reduction/measure",
        format!("{operator}: measure decreased on all {steps} steps ({plateaus} FUSE plateaus)"),
        format!("{operator}: termination measure violated"),
        failures,
    ));
    Ok(())
}

fn validate_strategies(
    config: &SuiteConfig,
    operator: OperatorKind,
    report: &mut ConformanceReport,
) -> Result<()> {
    let engine = config.engine_for(operator).engine();
    let left = engine.clone().with_strategy(Strategy::LeftmostFirst);
    let right = engine.with_strategy(Strategy::RightmostFirst);
    let mut failures = Vec::new();
    for fixture in fixtures::SENTENCES {
        let term = fixtures::parse(fixture.name, fixture.source)?;
        match (left.evaluate(&term), right.evaluate(&term)) {
            (Ok(l), Ok(r)) if l == r => {}
            (Ok(l), Ok(r)) => failures.push(format!("{operator}: {}: {l} vs {r}", fixture.name)),
            (Err(err), _) | (_, Err(err)) => failures.push(detail(operator, fixture.name, &err)),
        }
    }
    report.push(TestResult::from_failures(
        "reduction/strategies",
        format!("{operator}: both strategies reach the same terminal sentences"),
        format!("{operator}: strategies disagree"),
        failures,
    ));
    Ok(())
}
