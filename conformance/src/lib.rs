//! Prime calculus conformance suite.
//!
//! Runs the calculus against a fixed corpus of terms and checks the
//! properties every implementation of it must satisfy, under each
//! configured operator.
//!
//! # Conformance Scope
//!
//! | Area | Property |
//! |------|----------|
//! | Syntax | printed form parses back; malformed input is rejected at the right offset |
//! | Typing | fixtures get their expected kind; ill-typed terms are rejected |
//! | Reduction | expected normal forms, strictly decreasing measure, strategy independence |
//! | Confluence | every reduction path of a fixture meets in one terminal term |
//! | Semantics | reduction and lambda denotation agree; equivalence verdicts |
//! | Canonical triads | decompositions sum to their target and preserve values |
//!
//! # Entry Point
//!
//! ```no_run
//! use prime_calculus_conformance::{run_all, SuiteConfig};
//!
//! let report = run_all(&SuiteConfig::default())?;
//! assert!(report.all_passed());
//! # Ok::<(), anyhow::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod tests;
pub mod validators;

use prime_calculus::{EngineConfig, OperatorKind};
use serde::{Deserialize, Serialize};

pub use report::{ConformanceReport, Severity, TestResult};

/// Settings for a conformance run.
///
/// Deserializes from TOML; both fields are optional:
///
/// ```toml
/// operators = ["next-prime", "identity"]
///
/// [engine]
/// max_steps = 200
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Step bounds, modulus, strategy, and canonical weights. The
    /// `operator` field is replaced by each entry of `operators` in turn.
    pub engine: EngineConfig,
    /// Operators the operator-independent properties are checked under.
    pub operators: Vec<OperatorKind>,
}

impl SuiteConfig {
    /// The engine configuration with `operator` swapped in.
    pub fn engine_for(&self, operator: OperatorKind) -> EngineConfig {
        EngineConfig {
            operator,
            ..self.engine.clone()
        }
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            operators: OperatorKind::ALL.to_vec(),
        }
    }
}

/// Runs all conformance validators and returns the aggregated report.
///
/// Validators are run in this order:
/// 1. Syntax (round trip, error positions)
/// 2. Typing (expected kinds, rejections)
/// 3. Reduction (normal forms, termination measure, strategies)
/// 4. Confluence (overlapping redexes, fixture path exploration)
/// 5. Semantic agreement (reduction vs. lambda denotation)
/// 6. Equivalence verdicts
/// 7. Canonical fusion triads
///
/// # Errors
///
/// Returns an error only if a fixture in the corpus does not parse.
pub fn run_all(config: &SuiteConfig) -> anyhow::Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    tracing::info!(operators = ?config.operators, "running conformance suite");

    // 1. Syntax
    report.extend(validators::syntax::validate());

    // 2. Typing
    report.extend(validators::typing::validate()?);

    // 3. Reduction
    report.extend(validators::normalization::validate(config)?);

    // 4. Confluence
    report.extend(validators::confluence::validate(config)?);

    // 5. Semantic agreement
    report.extend(validators::semantics::validate(config)?);

    // 6. Equivalence
    report.extend(validators::equivalence::validate(config)?);

    // 7. Canonical triads
    report.extend(validators::canonical::validate(config)?);

    tracing::info!(
        results = report.results.len(),
        failures = report.failure_count(),
        "conformance suite finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests_unit {
    use super::*;

    fn failures(report: &ConformanceReport) -> Vec<&TestResult> {
        report.results.iter().filter(|r| r.is_failure()).collect()
    }

    #[test]
    fn default_suite_passes() {
        let report = run_all(&SuiteConfig::default()).unwrap();
        assert!(
            report.all_passed(),
            "conformance failures: {:#?}",
            failures(&report)
        );
        assert!(report.count(Severity::Pass) > 0);
    }

    #[test]
    fn every_validator_reports() {
        let report = run_all(&SuiteConfig::default()).unwrap();
        for area in [
            "syntax/",
            "typing/",
            "reduction/",
            "confluence/",
            "semantics/",
            "canonical/",
        ] {
            assert!(
                report.results.iter().any(|r| r.validator.starts_with(area)),
                "no results from {area}"
            );
        }
    }

    #[test]
    fn single_operator_suite_passes() {
        let config = SuiteConfig {
            operators: vec![OperatorKind::Identity],
            ..SuiteConfig::default()
        };
        let report = run_all(&config).unwrap();
        assert!(report.all_passed(), "{:#?}", failures(&report));
    }

    #[test]
    fn tight_step_bound_fails_reduction() {
        let config = SuiteConfig {
            engine: EngineConfig {
                max_steps: 1,
                ..EngineConfig::default()
            },
            ..SuiteConfig::default()
        };
        let report = run_all(&config).unwrap();
        assert!(!report.all_passed());
        assert!(failures(&report)
            .iter()
            .any(|r| r.validator.starts_with("reduction/")));
    }

    #[test]
    fn engine_for_keeps_other_settings() {
        let config = SuiteConfig {
            engine: EngineConfig {
                max_steps: 42,
                ..EngineConfig::default()
            },
            ..SuiteConfig::default()
        };
        let engine = config.engine_for(OperatorKind::Modular);
        assert_eq!(engine.operator, OperatorKind::Modular);
        assert_eq!(engine.max_steps, 42);
    }
}
