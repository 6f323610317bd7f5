//! Termination and confluence checks.
//!
//! These are executable checks over concrete terms, not proofs. The
//! strong-normalization check replays a normalization and asserts that
//! [`Term::reduction_measure`] strictly decreases at every step. It also
//! reports where [`Term::term_size`] alone plateaus, which is exactly the
//! FUSE steps: a fusion and its noun reduct both have size 1.
//!
//! The confluence check explores every reduction path of a term through
//! [`ReductionSystem::successors`] and asserts that all of them end in the
//! same terminal term.

use std::collections::HashMap;

use crate::error::{CalculusError, Result};
use crate::prime::first_n_primes;
use crate::term::Term;

use super::{ReductionSystem, ReductionTrace, Rule};

/// Distinct terms explored by [`confluence_of`] before it gives up.
pub const MAX_EXPLORED_STATES: usize = 10_000;

/// Sizes recorded around one reduction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MeasureSample {
    /// Rule applied.
    pub rule: Rule,
    /// [`Term::term_size`] before the step.
    pub size_before: usize,
    /// [`Term::term_size`] after the step.
    pub size_after: usize,
    /// [`Term::reduction_measure`] before the step.
    pub measure_before: usize,
    /// [`Term::reduction_measure`] after the step.
    pub measure_after: usize,
}

impl MeasureSample {
    /// Whether the structural size strictly decreased.
    #[must_use]
    pub fn size_decreased(&self) -> bool {
        self.size_after < self.size_before
    }
}

/// Outcome of [`demonstrate_strong_normalization`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NormalizationReport {
    trace: ReductionTrace,
    samples: Vec<MeasureSample>,
}

impl NormalizationReport {
    /// The replayed trace.
    #[must_use]
    pub fn trace(&self) -> &ReductionTrace {
        &self.trace
    }

    /// One sample per step.
    #[must_use]
    pub fn samples(&self) -> &[MeasureSample] {
        &self.samples
    }

    /// Indices of steps where `term_size` did not strictly decrease.
    pub fn size_plateaus(&self) -> impl Iterator<Item = usize> + '_ {
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.size_decreased())
            .map(|(i, _)| i)
    }
}

/// Normalizes `term` and checks the termination measure at every step.
///
/// # Errors
///
/// [`CalculusError::MeasureViolation`] at the first step whose
/// `reduction_measure` does not strictly decrease, and any error of
/// [`ReductionSystem::normalize`].
pub fn demonstrate_strong_normalization(
    engine: &ReductionSystem,
    term: &Term,
) -> Result<NormalizationReport> {
    let trace = engine.normalize(term)?;
    let mut samples = Vec::with_capacity(trace.len());
    for (step, s) in trace.steps().iter().enumerate() {
        let sample = MeasureSample {
            rule: s.rule,
            size_before: s.before.term_size(),
            size_after: s.after.term_size(),
            measure_before: s.before.reduction_measure(),
            measure_after: s.after.reduction_measure(),
        };
        if sample.measure_after >= sample.measure_before {
            return Err(CalculusError::MeasureViolation {
                step,
                rule: s.rule.name(),
                before: sample.measure_before,
                after: sample.measure_after,
            });
        }
        if !sample.size_decreased() {
            tracing::debug!(step, rule = %s.rule, size = sample.size_after, "term size plateau");
        }
        samples.push(sample);
    }
    Ok(NormalizationReport { trace, samples })
}

/// Outcome of [`confluence_of`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConfluenceReport {
    /// The explored term.
    pub term: Term,
    /// The terminal term every path reached.
    pub normal_form: Term,
    /// Number of distinct reduction paths.
    pub paths: u64,
    /// Number of distinct terms visited.
    pub states: usize,
}

/// Explores every reduction path of `term` and checks they share one
/// terminal term.
///
/// # Errors
///
/// - [`CalculusError::ConfluenceViolation`] if two paths end differently.
/// - [`CalculusError::NonTermination`] if more than
///   [`MAX_EXPLORED_STATES`] terms are reachable.
/// - Any error of [`ReductionSystem::successors`] along the way.
pub fn confluence_of(engine: &ReductionSystem, term: &Term) -> Result<ConfluenceReport> {
    let mut explorer = Explorer {
        engine,
        paths: HashMap::new(),
        terminals: Vec::new(),
    };
    let paths = explorer.visit(term)?;
    let mut terminals = explorer.terminals.into_iter();
    let Some(normal_form) = terminals.next() else {
        return Err(CalculusError::NonTermination {
            max_steps: MAX_EXPLORED_STATES,
            last: term.signature(),
        });
    };
    if let Some(other) = terminals.next() {
        return Err(CalculusError::ConfluenceViolation {
            term: term.signature(),
            left: normal_form.signature(),
            right: other.signature(),
        });
    }
    tracing::debug!(%term, paths, states = explorer.paths.len(), "confluent");
    Ok(ConfluenceReport {
        term: term.clone(),
        normal_form,
        paths,
        states: explorer.paths.len(),
    })
}

/// Depth-first walk of the reduction graph, memoizing path counts.
struct Explorer<'a> {
    engine: &'a ReductionSystem,
    paths: HashMap<Term, u64>,
    terminals: Vec<Term>,
}

impl Explorer<'_> {
    fn visit(&mut self, term: &Term) -> Result<u64> {
        if let Some(&known) = self.paths.get(term) {
            return Ok(known);
        }
        if self.paths.len() >= MAX_EXPLORED_STATES {
            return Err(CalculusError::NonTermination {
                max_steps: MAX_EXPLORED_STATES,
                last: term.signature(),
            });
        }
        let successors = self.engine.successors(term)?;
        let count = if successors.is_empty() {
            if !self.terminals.contains(term) {
                self.terminals.push(term.clone());
            }
            1
        } else {
            let mut total = 0u64;
            for step in successors {
                total = total.saturating_add(self.visit(&step.after)?);
            }
            total
        };
        self.paths.insert(term.clone(), count);
        Ok(count)
    }
}

/// Terms with more than one redex, built from the first six primes.
///
/// Each fixture pairs independent redexes under a sequence or an
/// implication, so leftmost and rightmost reduction genuinely interleave.
///
/// # Errors
///
/// Propagates construction errors; none occur for the built-in primes.
pub fn overlapping_redex_fixtures() -> Result<Vec<Term>> {
    let p = first_n_primes(6);
    let (f19, f23) = (Term::fuse(3, 5, 11)?, Term::fuse(5, 7, 11)?);
    let over = |ops: &[u64], noun: &Term| -> Result<Term> {
        let ops = ops.iter().map(|&q| Term::adj(q)).collect::<Result<Vec<_>>>()?;
        Ok(Term::sentence(Term::chain(ops, noun.clone())))
    };
    Ok(vec![
        Term::seq(
            Term::sentence(f19.clone()),
            Term::sentence(Term::chain_of(&[p[0]], p[3])?),
        ),
        Term::implies(over(&[p[1]], &f19)?, Term::sentence(f23.clone())),
        Term::seq(
            Term::seq(Term::sentence(Term::noun(p[0])?), Term::sentence(f23.clone())),
            Term::implies(
                Term::sentence(Term::chain_of(&[p[2], p[1]], p[3])?),
                Term::sentence(f19.clone()),
            ),
        ),
        Term::implies(
            Term::seq(
                Term::sentence(Term::chain_of(&[p[0], p[1], p[2]], p[4])?),
                over(&[p[5]], &f23)?,
            ),
            over(&[p[3]], &f19)?,
        ),
    ])
}

/// Runs [`confluence_of`] over [`overlapping_redex_fixtures`].
///
/// # Errors
///
/// The first failure of [`confluence_of`].
pub fn test_local_confluence(engine: &ReductionSystem) -> Result<Vec<ConfluenceReport>> {
    overlapping_redex_fixtures()?
        .iter()
        .map(|term| confluence_of(engine, term))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::operator::{IdentityPrimeOperator, Modulus, OperatorKind};

    fn identity() -> ReductionSystem {
        ReductionSystem::new(Arc::new(IdentityPrimeOperator))
    }

    #[test]
    fn fuse_plateaus_on_term_size_only() {
        let report =
            demonstrate_strong_normalization(&identity(), &Term::fuse(3, 5, 11).unwrap()).unwrap();
        let sample = report.samples()[0];
        assert_eq!((sample.size_before, sample.size_after), (1, 1));
        assert_eq!((sample.measure_before, sample.measure_after), (2, 1));
        assert_eq!(report.size_plateaus().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn apply_shrinks_chains_by_one() {
        for len in 0..=10 {
            let term = Term::chain_of(&vec![3; len], 7).unwrap();
            let report = demonstrate_strong_normalization(&identity(), &term).unwrap();
            assert_eq!(report.samples().len(), len);
            for s in report.samples() {
                assert_eq!(s.size_before, s.size_after + 1);
            }
            assert_eq!(report.size_plateaus().count(), 0);
        }
    }

    #[test]
    fn counts_interleavings() {
        let term = Term::seq(
            Term::sentence(Term::fuse(3, 5, 11).unwrap()),
            Term::sentence(Term::chain_of(&[2], 7).unwrap()),
        );
        let report = confluence_of(&identity(), &term).unwrap();
        assert_eq!(report.paths, 2);
        assert_eq!(report.states, 4);
        assert_eq!(report.normal_form.to_string(), "([N(19)] ; [N(7)])");
    }

    #[test]
    fn fixtures_are_confluent_under_every_operator() {
        for kind in OperatorKind::ALL {
            let engine = ReductionSystem::new(kind.build(Modulus::DEFAULT));
            let reports = test_local_confluence(&engine).unwrap();
            assert_eq!(reports.len(), overlapping_redex_fixtures().unwrap().len());
            assert!(reports.iter().all(|r| r.paths > 1));
        }
    }

    #[test]
    fn exploration_surfaces_engine_errors() {
        let term = Term::seq(
            Term::sentence(Term::fuse(3, 5, 7).unwrap()),
            Term::sentence(Term::fuse(3, 5, 11).unwrap()),
        );
        assert!(matches!(
            confluence_of(&identity(), &term),
            Err(CalculusError::IllFormedFusion { .. })
        ));
    }
}
