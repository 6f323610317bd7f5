//! Error taxonomy for the calculus.
//!
//! Every failure is raised synchronously at the point of violation. Nothing
//! is retried and no partial result is returned in place of an error. The
//! lambda evaluator is the one exception: it reports a stuck or unfinished
//! evaluation through [`crate::lambda::EvalOutcome::is_value`].

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, CalculusError>;

/// Errors raised by constructors, the type checker, the reduction engine,
/// the translator, and the verifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculusError {
    /// A positional argument that must be prime is not, or a fusion triple
    /// is not made of distinct odd primes.
    #[error("invalid prime argument {value}: {reason}")]
    InvalidPrime {
        /// The offending value.
        value: u64,
        /// Which invariant was violated.
        reason: &'static str,
    },

    /// A modulus below 2 was given to the modular operator.
    #[error("invalid modulus {value}: must be at least 2")]
    InvalidModulus {
        /// The offending value.
        value: u64,
    },

    /// Type checking failed.
    #[error("type mismatch in {term}: expected {expected}, found {actual}")]
    TypeMismatch {
        /// The type the rule or annotation required.
        expected: String,
        /// The type that was inferred.
        actual: String,
        /// Signature of the term being checked.
        term: String,
    },

    /// A prime operator was applied outside its domain.
    #[error("operator {operator} is not defined on ({p}, {q})")]
    OperatorDomain {
        /// Name of the operator.
        operator: &'static str,
        /// Left operand.
        p: u64,
        /// Right operand.
        q: u64,
    },

    /// A fusion whose sum is not prime was offered for reduction.
    #[error("ill-formed fusion FUSE({p},{q},{r}): sum {sum} is not prime")]
    IllFormedFusion {
        /// First component.
        p: u64,
        /// Second component.
        q: u64,
        /// Third component.
        r: u64,
        /// `p + q + r`, saturated on overflow.
        sum: u64,
    },

    /// Reduction exceeded its step bound without reaching a terminal term.
    #[error("reduction did not terminate within {max_steps} steps (last term: {last})")]
    NonTermination {
        /// The bound that was exhausted.
        max_steps: usize,
        /// Signature of the last term reached.
        last: String,
    },

    /// The translator was given a term it has no denotation for.
    #[error("term {term} cannot be translated: {reason}")]
    UntranslatableTerm {
        /// Signature of the offending term.
        term: String,
        /// Why the shape is not translatable.
        reason: &'static str,
    },

    /// A reduction step did not strictly decrease the termination measure.
    #[error("measure did not decrease at step {step} ({rule}): {before} -> {after}")]
    MeasureViolation {
        /// Zero-based index of the step.
        step: usize,
        /// Rule applied at that step.
        rule: &'static str,
        /// Measure before the step.
        before: usize,
        /// Measure after the step.
        after: usize,
    },

    /// Two reduction paths from the same term reached different terminals.
    #[error("reduction of {term} is not confluent: reaches {left} and {right}")]
    ConfluenceViolation {
        /// Signature of the starting term.
        term: String,
        /// One terminal term.
        left: String,
        /// A different terminal term.
        right: String,
    },

    /// Operational and denotational results disagree.
    #[error("semantics diverge for {term}: operational {operational}, denotational {denotational}")]
    SemanticDivergence {
        /// Signature of the term.
        term: String,
        /// Terminal term of the reduction engine.
        operational: String,
        /// Result of the lambda evaluator.
        denotational: String,
    },

    /// The textual notation could not be parsed.
    #[error("parse error at byte {position}: {message}")]
    Parse {
        /// Byte offset into the input.
        position: usize,
        /// Description of what was expected.
        message: String,
    },
}

impl CalculusError {
    pub(crate) fn not_prime(value: u64) -> Self {
        Self::InvalidPrime {
            value,
            reason: "not prime",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_violation() {
        let err = CalculusError::TypeMismatch {
            expected: "adjective".into(),
            actual: "noun".into(),
            term: "N(3)N(7)".into(),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch in N(3)N(7): expected adjective, found noun"
        );

        let err = CalculusError::IllFormedFusion {
            p: 3,
            q: 5,
            r: 7,
            sum: 15,
        };
        assert!(err.to_string().contains("sum 15 is not prime"));
    }
}
