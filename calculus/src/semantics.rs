//! Operational and denotational semantics side by side.
//!
//! [`Semantics::denote`] is `evaluate(translate(term))`. The agreement
//! check normalizes the term with the reduction engine, translates the
//! terminal term, and requires the result to be alpha-equivalent to the
//! denotation. When the terminal term is `N(v)` this says exactly that the
//! denotation is the constant `v`.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{CalculusError, Result};
use crate::lambda::{EvalOutcome, LambdaEvaluator, Translator};
use crate::operator::PrimeOperator;
use crate::prime::Prime;
use crate::reduction::ReductionSystem;
use crate::term::Term;

/// A successful agreement check.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SemanticAgreement {
    /// The checked term.
    pub term: Term,
    /// Terminal term of the reduction engine.
    pub operational: Term,
    /// Reduction steps taken.
    pub operational_steps: usize,
    /// The evaluated translation.
    pub denotation: EvalOutcome,
}

impl SemanticAgreement {
    /// The shared numeric value, when the term reduces to a noun.
    #[must_use]
    pub fn value(&self) -> Option<Prime> {
        self.operational.as_noun()
    }
}

/// The reduction engine, translator, and evaluator over one operator.
#[derive(Debug, Clone)]
pub struct Semantics {
    engine: ReductionSystem,
    translator: Translator,
    evaluator: LambdaEvaluator,
}

impl Semantics {
    /// All three components share `operator` and use default step bounds.
    #[must_use]
    pub fn new(operator: Arc<dyn PrimeOperator>) -> Self {
        Self {
            engine: ReductionSystem::new(Arc::clone(&operator)),
            translator: Translator::new(Arc::clone(&operator)),
            evaluator: LambdaEvaluator::new(operator),
        }
    }

    /// Components built from `config`.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            engine: config.engine(),
            translator: config.translator(),
            evaluator: config.evaluator(),
        }
    }

    /// The reduction engine.
    #[must_use]
    pub fn engine(&self) -> &ReductionSystem {
        &self.engine
    }

    /// The translator.
    #[must_use]
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// The evaluator.
    #[must_use]
    pub fn evaluator(&self) -> &LambdaEvaluator {
        &self.evaluator
    }

    /// `evaluate(translate(term))`.
    ///
    /// # Errors
    ///
    /// Any error of [`Translator::translate`]; evaluation itself never
    /// fails.
    pub fn denote(&self, term: &Term) -> Result<EvalOutcome> {
        let expr = self.translator.translate(term)?;
        Ok(self.evaluator.evaluate(&expr))
    }

    /// Whether two terms have alpha-equivalent denotations.
    ///
    /// # Errors
    ///
    /// As [`Semantics::denote`], for either term.
    pub fn equivalent(&self, t1: &Term, t2: &Term) -> Result<bool> {
        let (d1, d2) = (self.denote(t1)?, self.denote(t2)?);
        Ok(d1.result.alpha_eq(&d2.result))
    }

    /// Checks that reduction and denotation agree on `term`.
    ///
    /// # Errors
    ///
    /// - [`CalculusError::SemanticDivergence`] if the denotation is not a
    ///   value or differs from the translated terminal term.
    /// - Any error of [`ReductionSystem::normalize`] or
    ///   [`Translator::translate`].
    pub fn verify_semantic_equivalence(&self, term: &Term) -> Result<SemanticAgreement> {
        let trace = self.engine.normalize(term)?;
        let operational_steps = trace.len();
        let operational = trace.into_final_term();
        let denotation = self.denote(term)?;
        let expected = self.translator.translate(&operational)?;
        if !denotation.is_value || !denotation.result.alpha_eq(&expected) {
            tracing::warn!(%term, %operational, denotation = %denotation.result, "semantics diverge");
            return Err(CalculusError::SemanticDivergence {
                term: term.signature(),
                operational: operational.signature(),
                denotational: denotation.result.to_string(),
            });
        }
        tracing::debug!(
            %term,
            operational_steps,
            denotational_steps = denotation.steps,
            "semantics agree"
        );
        Ok(SemanticAgreement {
            term: term.clone(),
            operational,
            operational_steps,
            denotation,
        })
    }
}

impl Default for Semantics {
    fn default() -> Self {
        Self::new(crate::operator::default_operator())
    }
}

/// The constant a term denotes, if it denotes one.
///
/// # Errors
///
/// As [`Semantics::denote`].
pub fn denoted_value(semantics: &Semantics, term: &Term) -> Result<Option<Prime>> {
    Ok(semantics.denote(term)?.result.as_const())
}
