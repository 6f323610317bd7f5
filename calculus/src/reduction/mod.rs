//! Operational semantics: small-step reduction, canonical fusion triads, and
//! the termination and confluence checks.
//!
//! - [`ReductionSystem`]: the FUSE and APPLY rules plus sentence
//!   propagation, with bounded normalization into a [`ReductionTrace`]
//! - [`FusionCanonicalizer`]: selects the canonical triad `(p,q,r)` for a
//!   target prime
//! - [`verify`]: strong-normalization and local-confluence checks
//!
//! # Example
//!
//! ```
//! use prime_calculus::operator::IdentityPrimeOperator;
//! use prime_calculus::{ReductionSystem, Rule, Term};
//! use std::sync::Arc;
//!
//! let engine = ReductionSystem::new(Arc::new(IdentityPrimeOperator));
//! let trace = engine.normalize(&Term::fuse(3, 5, 11)?)?;
//! assert_eq!(trace.len(), 1);
//! assert_eq!(trace.steps()[0].rule, Rule::Fuse);
//! assert_eq!(trace.final_term(), &Term::noun(19)?);
//! # Ok::<(), prime_calculus::CalculusError>(())
//! ```

mod canonical;
mod engine;
pub mod verify;

use std::fmt;

pub use canonical::{CanonicalWeights, FusionCanonicalizer, Triad};
pub use engine::{ReductionSystem, Strategy, DEFAULT_MAX_STEPS};

use crate::operator::Combination;
use crate::prime::Prime;
use crate::term::Term;

/// A reduction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Rule {
    /// `FUSE(p,q,r) → N(p+q+r)`.
    Fuse,
    /// `A(p)…N(q) → …N(p ⊕ q)`.
    Apply,
}

impl Rule {
    /// Upper-case rule name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fuse => "FUSE",
            Self::Apply => "APPLY",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One edge on the path from the root of a term to a redex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Position {
    /// The noun position of a chain.
    Noun,
    /// The body of a noun sentence.
    Body,
    /// Left child of a sequence or implication.
    Left,
    /// Right child of a sequence or implication.
    Right,
}

/// Rule-specific data recorded with a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StepDetails {
    /// A fusion was collapsed.
    Fuse {
        /// The fused components.
        components: (Prime, Prime, Prime),
        /// Their (prime) sum.
        sum: Prime,
    },
    /// An operator was applied.
    Apply {
        /// The adjective's prime.
        operator: Prime,
        /// The noun's prime before the step.
        operand: Prime,
        /// How the operator combined them.
        combination: Combination,
    },
}

/// An applied rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReductionStep {
    /// The rule applied.
    pub rule: Rule,
    /// Whole term before the step.
    pub before: Term,
    /// Whole term after the step.
    pub after: Term,
    /// Path from the root to the contracted redex.
    pub path: Vec<Position>,
    /// Auxiliary data.
    pub details: StepDetails,
}

impl fmt::Display for ReductionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<5} {} → {}", self.rule, self.before, self.after)
    }
}

/// The ordered steps from an initial term to its terminal term.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReductionTrace {
    initial: Term,
    steps: Vec<ReductionStep>,
}

impl ReductionTrace {
    pub(crate) fn new(initial: Term) -> Self {
        Self {
            initial,
            steps: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, step: ReductionStep) {
        self.steps.push(step);
    }

    /// The term normalization started from.
    #[must_use]
    pub fn initial(&self) -> &Term {
        &self.initial
    }

    /// The recorded steps.
    #[must_use]
    pub fn steps(&self) -> &[ReductionStep] {
        &self.steps
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if the initial term was already terminal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The terminal term.
    #[must_use]
    pub fn final_term(&self) -> &Term {
        self.steps.last().map_or(&self.initial, |s| &s.after)
    }

    /// Consumes the trace, returning the terminal term.
    #[must_use]
    pub fn into_final_term(mut self) -> Term {
        match self.steps.pop() {
            Some(step) => step.after,
            None => self.initial,
        }
    }

    /// Rules in application order.
    pub fn rules(&self) -> impl Iterator<Item = Rule> + '_ {
        self.steps.iter().map(|s| s.rule)
    }
}

impl fmt::Display for ReductionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    {}", self.initial)?;
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "{:>3} {:<5} → {}", i + 1, step.rule, step.after)?;
        }
        Ok(())
    }
}
