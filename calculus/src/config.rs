//! Engine configuration.
//!
//! [`EngineConfig`] collects every tunable of the calculus in one place.
//! Under the `serde` feature it deserializes from any self-describing
//! format; missing fields take their defaults, so an empty table is a
//! valid configuration:
//!
//! ```toml
//! operator = "modular"
//! modulus = 101
//! max_steps = 500
//! strategy = "rightmost-first"
//!
//! [weights]
//! balance = 1.0
//! ```

use std::sync::Arc;

use crate::lambda::{LambdaEvaluator, Translator, DEFAULT_EVAL_MAX_STEPS};
use crate::operator::{Modulus, OperatorKind, PrimeOperator};
use crate::reduction::{
    CanonicalWeights, FusionCanonicalizer, ReductionSystem, Strategy, DEFAULT_MAX_STEPS,
};
use crate::semantics::Semantics;

/// Tunables for the reduction engine, the evaluator, and the canonicalizer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct EngineConfig {
    /// The ⊕ strategy.
    pub operator: OperatorKind,
    /// Base of the modular operator; ignored by the others.
    pub modulus: Modulus,
    /// Step bound of [`ReductionSystem::normalize`].
    pub max_steps: usize,
    /// Step bound of [`LambdaEvaluator::evaluate`].
    pub eval_max_steps: usize,
    /// Sentence reduction order.
    pub strategy: Strategy,
    /// Canonical triad scoring.
    pub weights: CanonicalWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            operator: OperatorKind::default(),
            modulus: Modulus::DEFAULT,
            max_steps: DEFAULT_MAX_STEPS,
            eval_max_steps: DEFAULT_EVAL_MAX_STEPS,
            strategy: Strategy::default(),
            weights: CanonicalWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Instantiates the configured operator.
    #[must_use]
    pub fn build_operator(&self) -> Arc<dyn PrimeOperator> {
        self.operator.build(self.modulus)
    }

    /// A reduction engine with these settings.
    #[must_use]
    pub fn engine(&self) -> ReductionSystem {
        ReductionSystem::from_config(self)
    }

    /// A translator over the configured operator.
    #[must_use]
    pub fn translator(&self) -> Translator {
        Translator::new(self.build_operator())
    }

    /// An evaluator over the configured operator and step bound.
    #[must_use]
    pub fn evaluator(&self) -> LambdaEvaluator {
        LambdaEvaluator::new(self.build_operator()).with_max_steps(self.eval_max_steps)
    }

    /// The semantics façade with these settings.
    #[must_use]
    pub fn semantics(&self) -> Semantics {
        Semantics::from_config(self)
    }

    /// A canonicalizer with the configured weights.
    #[must_use]
    pub fn canonicalizer(&self) -> FusionCanonicalizer {
        FusionCanonicalizer::with_weights(self.weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.operator, OperatorKind::Resonance);
        assert_eq!(config.modulus.get(), crate::operator::DEFAULT_MODULUS);
        assert_eq!(config.max_steps, 1000);
        assert_eq!(config.eval_max_steps, 1000);
        assert_eq!(config.build_operator().name(), "resonance");
        assert_eq!(config.engine().max_steps(), 1000);
    }

    #[test]
    fn components_follow_settings() {
        let config = EngineConfig {
            operator: OperatorKind::Identity,
            max_steps: 7,
            eval_max_steps: 9,
            strategy: Strategy::RightmostFirst,
            ..EngineConfig::default()
        };
        let engine = config.engine();
        assert_eq!(engine.operator().name(), "identity");
        assert_eq!(engine.max_steps(), 7);
        assert_eq!(engine.strategy(), Strategy::RightmostFirst);
        assert_eq!(config.evaluator().max_steps(), 9);
        assert_eq!(config.evaluator().operator().name(), "identity");
    }
}
