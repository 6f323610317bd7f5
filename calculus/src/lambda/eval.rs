use std::fmt;
use std::sync::Arc;

use crate::operator::{apply_oriented, PrimeOperator};

use super::expr::{FreshNames, LambdaExpr};

/// Step bound used by [`LambdaEvaluator::new`].
pub const DEFAULT_EVAL_MAX_STEPS: usize = 1000;

/// What an evaluation reached.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EvalOutcome {
    /// The last expression reached.
    pub result: LambdaExpr,
    /// Steps taken.
    pub steps: usize,
    /// Whether `result` is a value. False when evaluation got stuck or ran
    /// out of steps.
    pub is_value: bool,
}

impl fmt::Display for EvalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_value { "value" } else { "stuck" };
        write!(f, "{} ({status} after {} steps)", self.result, self.steps)
    }
}

/// Call-by-value small-step interpreter for [`LambdaExpr`].
///
/// The function position is evaluated before the argument, and the left
/// component of a pair, implication, or primitive before the right. A
/// primitive over two constants reduces through [`apply_oriented`], with
/// the same ordering and fallback as the reduction engine.
#[derive(Clone)]
pub struct LambdaEvaluator {
    operator: Arc<dyn PrimeOperator>,
    max_steps: usize,
}

impl fmt::Debug for LambdaEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LambdaEvaluator")
            .field("operator", &self.operator.name())
            .field("max_steps", &self.max_steps)
            .finish()
    }
}

impl LambdaEvaluator {
    /// An evaluator bounded by [`DEFAULT_EVAL_MAX_STEPS`].
    #[must_use]
    pub fn new(operator: Arc<dyn PrimeOperator>) -> Self {
        Self {
            operator,
            max_steps: DEFAULT_EVAL_MAX_STEPS,
        }
    }

    /// Replaces the step bound.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// The injected operator.
    #[must_use]
    pub fn operator(&self) -> &Arc<dyn PrimeOperator> {
        &self.operator
    }

    /// The step bound.
    #[must_use]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Evaluates until a value, a stuck expression, or the step bound.
    /// Never fails.
    #[must_use]
    pub fn evaluate(&self, expr: &LambdaExpr) -> EvalOutcome {
        let mut fresh = FreshNames::new();
        let mut current = expr.clone();
        let mut steps = 0;
        while steps < self.max_steps {
            match self.step(&current, &mut fresh) {
                Some(next) => {
                    tracing::trace!(step = steps, expr = %next);
                    current = next;
                    steps += 1;
                }
                None => break,
            }
        }
        let is_value = current.is_value();
        if !is_value {
            tracing::warn!(steps, expr = %current, "lambda evaluation did not reach a value");
        }
        EvalOutcome {
            result: current,
            steps,
            is_value,
        }
    }

    /// One call-by-value step, or `None` if `expr` is a value or stuck.
    #[must_use]
    pub fn step(&self, expr: &LambdaExpr, fresh: &mut FreshNames) -> Option<LambdaExpr> {
        use LambdaExpr as E;
        match expr {
            E::Var(_) | E::Const(_) | E::Lam(..) => None,
            E::App(function, argument) => {
                if !function.is_value() {
                    return Some(E::app(self.step(function, fresh)?, (**argument).clone()));
                }
                if !argument.is_value() {
                    return Some(E::app((**function).clone(), self.step(argument, fresh)?));
                }
                match &**function {
                    E::Lam(param, body) => Some(body.substitute(param, argument, fresh)),
                    _ => None,
                }
            }
            E::Pair(l, r) => self
                .step_pair(l, r, fresh)
                .map(|(l, r)| E::pair(l, r)),
            E::Impl(l, r) => self
                .step_pair(l, r, fresh)
                .map(|(l, r)| E::implies(l, r)),
            E::PrimOp { op, left, right } => {
                if !left.is_value() || !right.is_value() {
                    return self
                        .step_pair(left, right, fresh)
                        .map(|(l, r)| E::prim_op(*op, l, r));
                }
                self.apply_primitive(*op, left, right)
            }
        }
    }

    fn step_pair(
        &self,
        left: &LambdaExpr,
        right: &LambdaExpr,
        fresh: &mut FreshNames,
    ) -> Option<(LambdaExpr, LambdaExpr)> {
        if !left.is_value() {
            Some((self.step(left, fresh)?, right.clone()))
        } else {
            Some((left.clone(), self.step(right, fresh)?))
        }
    }

    fn apply_primitive(
        &self,
        op: &'static str,
        left: &LambdaExpr,
        right: &LambdaExpr,
    ) -> Option<LambdaExpr> {
        if op != self.operator.name() {
            tracing::debug!(op, evaluator = self.operator.name(), "foreign primitive is stuck");
            return None;
        }
        let (adj, noun) = (left.as_const()?, right.as_const()?);
        match apply_oriented(&*self.operator, adj, noun) {
            Ok(combination) => Some(LambdaExpr::Const(combination.result)),
            Err(err) => {
                tracing::warn!(%err, "primitive is stuck");
                None
            }
        }
    }
}
