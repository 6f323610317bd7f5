//! Property validators, one module per area of the calculus.
//!
//! Each `validate` function returns a [`ConformanceReport`](crate::ConformanceReport).
//! Calculus errors raised by a check become failure results; only a fixture
//! that does not parse aborts the run.

pub mod canonical;
pub mod confluence;
pub mod equivalence;
pub mod normalization;
pub mod semantics;
pub mod syntax;
pub mod typing;

use prime_calculus::{CalculusError, OperatorKind};

/// `"<operator>: <fixture>: <error>"`, the detail line for a failed check.
fn detail(operator: OperatorKind, fixture: &str, err: &CalculusError) -> String {
    format!("{operator}: {fixture}: {err}")
}
