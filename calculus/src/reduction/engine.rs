//! The reduction engine.
//!
//! States are terms; transitions are rule applications; a term on which
//! [`ReductionSystem::step`] returns `None` is terminal.

use std::fmt;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{CalculusError, Result};
use crate::operator::{apply_oriented, PrimeOperator};
use crate::term::{Chain, Term};
use crate::types::TypeKind;

use super::{Position, ReductionStep, ReductionTrace, Rule, StepDetails};

/// Step bound used by [`ReductionSystem::new`].
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// Which child of a sequence or implication is reduced first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Strategy {
    /// Left child to terminal form, then the right child.
    #[default]
    LeftmostFirst,
    /// Right child to terminal form, then the left child.
    RightmostFirst,
}

/// A contracted redex, before it is wrapped back into its context.
struct Contraction {
    rule: Rule,
    path: Vec<Position>,
    details: StepDetails,
}

impl Contraction {
    fn under(mut self, position: Position) -> Self {
        self.path.insert(0, position);
        self
    }
}

/// Small-step operational semantics over [`Term`].
#[derive(Clone)]
pub struct ReductionSystem {
    operator: Arc<dyn PrimeOperator>,
    max_steps: usize,
    strategy: Strategy,
}

impl fmt::Debug for ReductionSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReductionSystem")
            .field("operator", &self.operator.name())
            .field("max_steps", &self.max_steps)
            .field("strategy", &self.strategy)
            .finish()
    }
}

impl ReductionSystem {
    /// An engine applying chains with `operator`, bounded by
    /// [`DEFAULT_MAX_STEPS`], reducing leftmost first.
    #[must_use]
    pub fn new(operator: Arc<dyn PrimeOperator>) -> Self {
        Self {
            operator,
            max_steps: DEFAULT_MAX_STEPS,
            strategy: Strategy::LeftmostFirst,
        }
    }

    /// An engine configured from `config`.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.build_operator())
            .with_max_steps(config.max_steps)
            .with_strategy(config.strategy)
    }

    /// Replaces the step bound.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Replaces the sentence reduction order.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
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

    /// The sentence reduction order.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Applies one rule, or returns `None` if `term` is terminal.
    ///
    /// # Errors
    ///
    /// - [`CalculusError::IllFormedFusion`] when the next redex is a fusion
    ///   whose sum is not prime.
    /// - [`CalculusError::TypeMismatch`] when a chain's innermost operator is
    ///   not an adjective or its noun position is not noun-typed.
    /// - [`CalculusError::OperatorDomain`] if the operator overflows.
    pub fn step(&self, term: &Term) -> Result<Option<ReductionStep>> {
        Ok(self
            .contract(term)?
            .map(|(after, c)| self.record(term, after, c)))
    }

    /// Every one-step reduct of `term`, one per redex position, ordered
    /// left to right.
    ///
    /// # Errors
    ///
    /// As [`ReductionSystem::step`], for any redex position.
    pub fn successors(&self, term: &Term) -> Result<Vec<ReductionStep>> {
        Ok(self
            .contract_all(term)?
            .into_iter()
            .map(|(after, c)| self.record(term, after, c))
            .collect())
    }

    /// Reduces `term` to a terminal term, recording every step.
    ///
    /// # Errors
    ///
    /// [`CalculusError::NonTermination`] if `max_steps` steps do not reach
    /// a terminal term, and any error of [`ReductionSystem::step`].
    pub fn normalize(&self, term: &Term) -> Result<ReductionTrace> {
        tracing::debug!(
            operator = self.operator.name(),
            shape = term.shape(),
            size = term.term_size(),
            "normalizing"
        );
        let mut trace = ReductionTrace::new(term.clone());
        for index in 0..self.max_steps {
            let Some(step) = self.step(trace.final_term())? else {
                tracing::debug!(
                    operator = self.operator.name(),
                    steps = index,
                    "reached terminal term"
                );
                return Ok(trace);
            };
            tracing::debug!(rule = %step.rule, index, "reduction step");
            tracing::trace!(before = %step.before, after = %step.after);
            trace.push(step);
        }
        if self.contract(trace.final_term())?.is_none() {
            return Ok(trace);
        }
        tracing::warn!(
            max_steps = self.max_steps,
            last = %trace.final_term(),
            "step limit exhausted"
        );
        Err(CalculusError::NonTermination {
            max_steps: self.max_steps,
            last: trace.final_term().signature(),
        })
    }

    /// The terminal term of [`ReductionSystem::normalize`].
    ///
    /// # Errors
    ///
    /// As [`ReductionSystem::normalize`].
    pub fn evaluate(&self, term: &Term) -> Result<Term> {
        self.normalize(term).map(ReductionTrace::into_final_term)
    }

    /// Normalizes both terms and compares them: numerically when both reach
    /// nouns, by signature otherwise.
    ///
    /// # Errors
    ///
    /// As [`ReductionSystem::normalize`], for either term.
    pub fn equivalent(&self, t1: &Term, t2: &Term) -> Result<bool> {
        let (n1, n2) = (self.evaluate(t1)?, self.evaluate(t2)?);
        Ok(match (n1.as_noun(), n2.as_noun()) {
            (Some(p), Some(q)) => p == q,
            _ => n1.signature() == n2.signature(),
        })
    }

    fn record(&self, before: &Term, after: Term, c: Contraction) -> ReductionStep {
        ReductionStep {
            rule: c.rule,
            before: before.clone(),
            after,
            path: c.path,
            details: c.details,
        }
    }

    /// Finds and contracts the redex chosen by the strategy, returning the
    /// rebuilt term.
    fn contract(&self, term: &Term) -> Result<Option<(Term, Contraction)>> {
        match term {
            Term::Noun(_) | Term::Adj(_) => Ok(None),
            Term::Fusion(_) | Term::Chain(_) => self.contract_noun(term),
            Term::NounSentence(body) => Ok(self
                .contract(body)?
                .map(|(b, c)| (Term::sentence(b), c.under(Position::Body)))),
            Term::Seq(l, r) | Term::Impl(l, r) => {
                let rebuild = |l: Term, r: Term| match term {
                    Term::Seq(..) => Term::seq(l, r),
                    _ => Term::implies(l, r),
                };
                let left_first = self.strategy == Strategy::LeftmostFirst;
                let (first, second) = if left_first { (l, r) } else { (r, l) };
                let (pos_first, pos_second) = if left_first {
                    (Position::Left, Position::Right)
                } else {
                    (Position::Right, Position::Left)
                };
                if let Some((reduced, c)) = self.contract(first)? {
                    let (l, r) = if left_first {
                        (reduced, (**r).clone())
                    } else {
                        ((**l).clone(), reduced)
                    };
                    return Ok(Some((rebuild(l, r), c.under(pos_first))));
                }
                Ok(self.contract(second)?.map(|(reduced, c)| {
                    let (l, r) = if left_first {
                        ((**l).clone(), reduced)
                    } else {
                        (reduced, (**r).clone())
                    };
                    (rebuild(l, r), c.under(pos_second))
                }))
            }
        }
    }

    /// All contractions, left to right.
    fn contract_all(&self, term: &Term) -> Result<Vec<(Term, Contraction)>> {
        match term {
            Term::Noun(_) | Term::Adj(_) => Ok(Vec::new()),
            Term::Fusion(_) | Term::Chain(_) => Ok(self.contract_noun(term)?.into_iter().collect()),
            Term::NounSentence(body) => Ok(self
                .contract_all(body)?
                .into_iter()
                .map(|(b, c)| (Term::sentence(b), c.under(Position::Body)))
                .collect()),
            Term::Seq(l, r) | Term::Impl(l, r) => {
                let rebuild = |l: Term, r: Term| match term {
                    Term::Seq(..) => Term::seq(l, r),
                    _ => Term::implies(l, r),
                };
                let mut out = Vec::new();
                for (reduced, c) in self.contract_all(l)? {
                    out.push((rebuild(reduced, (**r).clone()), c.under(Position::Left)));
                }
                for (reduced, c) in self.contract_all(r)? {
                    out.push((rebuild((**l).clone(), reduced), c.under(Position::Right)));
                }
                Ok(out)
            }
        }
    }

    /// Noun-typed redexes: fusions and chains. Each has at most one redex.
    fn contract_noun(&self, term: &Term) -> Result<Option<(Term, Contraction)>> {
        match term {
            Term::Fusion(fusion) => {
                let sum = fusion.fused()?;
                Ok(Some((
                    Term::Noun(sum),
                    Contraction {
                        rule: Rule::Fuse,
                        path: Vec::new(),
                        details: StepDetails::Fuse {
                            components: fusion.components(),
                            sum,
                        },
                    },
                )))
            }
            Term::Chain(chain) => self.contract_chain(chain),
            _ => Ok(None),
        }
    }

    fn contract_chain(&self, chain: &Chain) -> Result<Option<(Term, Contraction)>> {
        let Some((innermost, rest)) = chain.split_innermost() else {
            return Ok(None);
        };
        match chain.noun() {
            Term::Noun(operand) => {
                let Term::Adj(operator) = innermost else {
                    return Err(mismatch(TypeKind::Adj, innermost));
                };
                let combination = apply_oriented(&*self.operator, *operator, *operand)?;
                Ok(Some((
                    Term::chain(rest.to_vec(), Term::Noun(combination.result)),
                    Contraction {
                        rule: Rule::Apply,
                        path: Vec::new(),
                        details: StepDetails::Apply {
                            operator: *operator,
                            operand: *operand,
                            combination,
                        },
                    },
                )))
            }
            noun @ (Term::Fusion(_) | Term::Chain(_)) => match self.contract_noun(noun)? {
                Some((reduced, c)) => Ok(Some((chain.with_noun(reduced), c.under(Position::Noun)))),
                None => Err(mismatch(TypeKind::Noun, noun)),
            },
            other => Err(mismatch(TypeKind::Noun, other)),
        }
    }
}

fn mismatch(expected: TypeKind, found: &Term) -> CalculusError {
    CalculusError::TypeMismatch {
        expected: expected.to_string(),
        actual: TypeKind::of_shape(found).to_string(),
        term: found.signature(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::{IdentityPrimeOperator, NextPrimeOperator, ResonancePrimeOperator};

    fn n(p: u64) -> Term {
        Term::noun(p).unwrap()
    }

    fn a(p: u64) -> Term {
        Term::adj(p).unwrap()
    }

    fn identity() -> ReductionSystem {
        ReductionSystem::new(Arc::new(IdentityPrimeOperator))
    }

    #[test]
    fn fuse_in_one_step() {
        let trace = identity().normalize(&Term::fuse(3, 5, 11).unwrap()).unwrap();
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.final_term(), &n(19));
        assert!(matches!(
            trace.steps()[0].details,
            StepDetails::Fuse { sum, .. } if sum.get() == 19
        ));
    }

    #[test]
    fn ill_formed_fusion_fails() {
        let err = identity().step(&Term::fuse(3, 5, 7).unwrap()).unwrap_err();
        assert!(matches!(err, CalculusError::IllFormedFusion { sum: 15, .. }));
    }

    #[test]
    fn apply_pops_innermost_operator() {
        let engine = ReductionSystem::new(Arc::new(NextPrimeOperator));
        let term = Term::chain_of(&[2, 3], 7).unwrap();
        let step = engine.step(&term).unwrap().unwrap();
        // 3 ⊕ 7 = next prime ≥ 10 = 11
        assert_eq!(step.after, Term::chain_of(&[2], 11).unwrap());
        let trace = engine.normalize(&term).unwrap();
        // 2 ⊕ 11 = next prime ≥ 13 = 13
        assert_eq!(trace.final_term(), &n(13));
        assert_eq!(trace.rules().collect::<Vec<_>>(), vec![Rule::Apply, Rule::Apply]);
    }

    #[test]
    fn identity_is_a_left_zero() {
        let term = Term::chain(vec![a(2), a(3), a(11), a(13)], n(7));
        assert_eq!(identity().evaluate(&term).unwrap(), n(7));
    }

    #[test]
    fn chain_over_fusion_fuses_first() {
        let engine = ReductionSystem::new(Arc::new(NextPrimeOperator));
        let term = Term::chain(vec![a(3)], Term::fuse(3, 5, 11).unwrap());
        let trace = engine.normalize(&term).unwrap();
        assert_eq!(trace.rules().collect::<Vec<_>>(), vec![Rule::Fuse, Rule::Apply]);
        assert_eq!(trace.steps()[0].path, vec![Position::Noun]);
        // 3 ⊕ 19 = next prime ≥ 22 = 23
        assert_eq!(trace.final_term(), &n(23));
    }

    #[test]
    fn ill_typed_chain_fails_loudly() {
        let term = Term::chain(vec![n(3)], n(7));
        assert!(matches!(
            identity().step(&term),
            Err(CalculusError::TypeMismatch { .. })
        ));
        let term = Term::chain(vec![a(3)], a(7));
        assert!(matches!(
            identity().normalize(&term),
            Err(CalculusError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn sentences_reduce_left_before_right() {
        let term = Term::seq(
            Term::sentence(Term::fuse(3, 5, 11).unwrap()),
            Term::sentence(Term::chain_of(&[2], 7).unwrap()),
        );
        let trace = identity().normalize(&term).unwrap();
        assert_eq!(trace.initial(), &term);
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.steps()[0].path, vec![Position::Left, Position::Body]);
        assert_eq!(trace.steps()[1].path, vec![Position::Right, Position::Body]);
        assert_eq!(trace.final_term().to_string(), "([N(19)] ; [N(7)])");

        let right_first = identity().with_strategy(Strategy::RightmostFirst);
        let trace_rf = right_first.normalize(&term).unwrap();
        assert_eq!(trace_rf.steps()[0].path, vec![Position::Right, Position::Body]);
        assert_eq!(trace_rf.final_term(), trace.final_term());
    }

    #[test]
    fn stuck_terms_are_terminal() {
        assert!(identity().step(&a(5)).unwrap().is_none());
        assert!(identity().step(&n(5)).unwrap().is_none());
        let trace = identity().normalize(&a(5)).unwrap();
        assert!(trace.is_empty());
        assert_eq!(trace.initial(), &a(5));
        assert_eq!(trace.final_term(), &a(5));
    }

    #[test]
    fn step_limit_is_fatal() {
        let engine = identity().with_max_steps(5);
        let term = Term::chain_of(&[3; 20], 7).unwrap();
        assert_eq!(
            engine.normalize(&term),
            Err(CalculusError::NonTermination {
                max_steps: 5,
                last: Term::chain_of(&[3; 15], 7).unwrap().signature(),
            })
        );
        // Exactly enough steps is not a failure.
        let engine = identity().with_max_steps(20);
        assert_eq!(engine.evaluate(&term).unwrap(), n(7));
    }

    #[test]
    fn successors_cover_every_redex() {
        let term = Term::implies(
            Term::sentence(Term::chain_of(&[3], 5).unwrap()),
            Term::seq(
                Term::sentence(Term::fuse(3, 5, 11).unwrap()),
                Term::sentence(n(2)),
            ),
        );
        let steps = identity().successors(&term).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].rule, Rule::Apply);
        assert_eq!(steps[1].rule, Rule::Fuse);
        assert_eq!(
            steps[1].path,
            vec![Position::Right, Position::Left, Position::Body]
        );
    }

    #[test]
    fn equivalence() {
        let engine = ReductionSystem::new(Arc::new(ResonancePrimeOperator));
        let t1 = Term::fuse(3, 5, 11).unwrap();
        let t2 = n(19);
        assert!(engine.equivalent(&t1, &t2).unwrap());
        assert!(engine.equivalent(&t2, &t1).unwrap());
        assert!(!engine.equivalent(&t1, &n(23)).unwrap());
        let s1 = Term::sentence(t1);
        let s2 = Term::sentence(t2);
        assert!(engine.equivalent(&s1, &s2).unwrap());
        assert!(!engine.equivalent(&s1, &n(19)).unwrap());
    }
}
