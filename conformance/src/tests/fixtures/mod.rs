//! Term fixtures for conformance validation.
//!
//! Each fixture is written in the printed notation, so parsing it and
//! printing the result gives back the source text. Expected normal forms
//! are those under [`EXPECTATION_OPERATOR`]; the other operators are only
//! held to the operator-independent properties.

mod equivalence;
mod nouns;
mod rejected;
mod sentences;

use anyhow::{Context, Result};
use prime_calculus::types::TypeKind;
use prime_calculus::{parse_term, OperatorKind, Term};

pub use equivalence::EQUIVALENCE_PAIRS;
pub use nouns::NOUNS;
pub use rejected::{ILL_TYPED, MALFORMED};
pub use sentences::SENTENCES;

/// Operator under which [`Fixture::normal_form`] and
/// [`EquivalencePair::equivalent`] are stated.
pub const EXPECTATION_OPERATOR: OperatorKind = OperatorKind::NextPrime;

/// A well-typed term with its expected type kind and normal form.
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    /// Short identifier used in report messages.
    pub name: &'static str,
    /// The term, in printed form.
    pub source: &'static str,
    /// Kind of the inferred type.
    pub kind: TypeKind,
    /// Terminal term under [`EXPECTATION_OPERATOR`], in printed form.
    pub normal_form: &'static str,
}

/// A term that parses but must be rejected by the type checker.
#[derive(Debug, Clone, Copy)]
pub struct IllTyped {
    /// Short identifier used in report messages.
    pub name: &'static str,
    /// The term, in printed form.
    pub source: &'static str,
    /// Expected error: `"type-mismatch"` or `"ill-formed-fusion"`.
    pub error: &'static str,
}

/// Input the parser must reject at a given byte offset.
#[derive(Debug, Clone, Copy)]
pub struct Malformed {
    /// The input text.
    pub source: &'static str,
    /// Expected error position.
    pub position: usize,
}

/// Two noun expressions and whether they normalize to the same prime.
#[derive(Debug, Clone, Copy)]
pub struct EquivalencePair {
    /// Left term.
    pub left: &'static str,
    /// Right term.
    pub right: &'static str,
    /// Expected verdict under [`EXPECTATION_OPERATOR`].
    pub equivalent: bool,
}

/// Every well-typed fixture: noun expressions, then sentences.
pub fn well_typed() -> impl Iterator<Item = &'static Fixture> {
    NOUNS.iter().chain(SENTENCES.iter())
}

/// Parses a fixture source.
///
/// # Errors
///
/// Returns an error naming the fixture if its source does not parse.
pub fn parse(name: &str, source: &str) -> Result<Term> {
    parse_term(source).with_context(|| format!("fixture {name} does not parse: {source}"))
}
