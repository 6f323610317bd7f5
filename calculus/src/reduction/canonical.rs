//! Canonical fusion triads.
//!
//! Many triads fuse to the same prime: `FUSE(3,7,13)` and `FUSE(5,7,11)`
//! both reduce to `N(23)`. For a target prime `P` the canonicalizer enumerates
//! `D(P) = {(p,q,r) : p<q<r distinct odd primes, p+q+r = P}`, scores each
//! triad, and selects the highest score, breaking ties lexicographically.
//!
//! The per-target triad lists are memoized. The memo is derived data only;
//! dropping it never changes a result.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::Result;
use crate::prime::{is_prime, next_prime_after, Prime};
use crate::term::{Fusion, Term};

/// Scores closer than this are treated as ties.
const SCORE_EPSILON: f64 = 1e-12;

/// Weights of the three scoring components.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CanonicalWeights {
    /// Weight of `1 / (1 + variance)`.
    pub balance: f64,
    /// Weight of `1 / ln(p·q·r)`.
    pub smallness: f64,
    /// Weight of the bonus for ratios near 2, 3, or 4.
    pub harmony: f64,
}

impl Default for CanonicalWeights {
    fn default() -> Self {
        Self {
            balance: 0.5,
            smallness: 0.3,
            harmony: 0.2,
        }
    }
}

/// A decomposition `p < q < r` of a target prime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Triad {
    /// Smallest component.
    pub p: Prime,
    /// Middle component.
    pub q: Prime,
    /// Largest component.
    pub r: Prime,
}

impl Triad {
    /// `p + q + r`.
    #[must_use]
    pub fn sum(&self) -> u64 {
        self.p.get() + self.q.get() + self.r.get()
    }

    /// The triad as a fusion term.
    ///
    /// # Errors
    ///
    /// Never fails for triads produced by the canonicalizer; the
    /// components are distinct odd primes by construction.
    pub fn to_term(&self) -> Result<Term> {
        Term::fuse(self.p.get(), self.q.get(), self.r.get())
    }

    fn as_f64(&self) -> (f64, f64, f64) {
        (self.p.get() as f64, self.q.get() as f64, self.r.get() as f64)
    }

    fn balance(&self) -> f64 {
        let (p, q, r) = self.as_f64();
        let mean = (p + q + r) / 3.0;
        let variance = ((p - mean).powi(2) + (q - mean).powi(2) + (r - mean).powi(2)) / 3.0;
        1.0 / (1.0 + variance)
    }

    fn smallness(&self) -> f64 {
        let (p, q, r) = self.as_f64();
        1.0 / (p * q * r).ln()
    }

    fn harmony(&self) -> f64 {
        let (p, q, r) = self.as_f64();
        let bonus: f64 = [q / p, r / q, r / p]
            .into_iter()
            .map(|ratio| {
                let nearest = ratio.round();
                if (2.0..=4.0).contains(&nearest) {
                    1.0 / (1.0 + 10.0 * (ratio - nearest).abs())
                } else {
                    0.0
                }
            })
            .sum();
        bonus / 3.0
    }
}

impl fmt::Display for Triad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.p, self.q, self.r)
    }
}

/// Selects canonical fusion triads.
#[derive(Debug, Default)]
pub struct FusionCanonicalizer {
    weights: CanonicalWeights,
    cache: RwLock<HashMap<u64, Arc<[Triad]>>>,
}

impl FusionCanonicalizer {
    /// A canonicalizer with the default weights.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A canonicalizer with custom weights.
    #[must_use]
    pub fn with_weights(weights: CanonicalWeights) -> Self {
        Self {
            weights,
            cache: RwLock::default(),
        }
    }

    /// The scoring weights.
    #[must_use]
    pub fn weights(&self) -> CanonicalWeights {
        self.weights
    }

    /// Number of memoized targets.
    #[must_use]
    pub fn cached_targets(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// `D(target)` in lexicographic order.
    ///
    /// # Errors
    ///
    /// Returns [`CalculusError::InvalidPrime`](crate::CalculusError::InvalidPrime) if `target` is not prime.
    pub fn triads(&self, target: u64) -> Result<Arc<[Triad]>> {
        Prime::new(target)?;
        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&target)
        {
            return Ok(Arc::clone(hit));
        }
        let triads: Arc<[Triad]> = enumerate(target).into();
        tracing::debug!(target, count = triads.len(), "enumerated fusion triads");
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(target).or_insert(triads)))
    }

    /// Weighted score of a triad.
    #[must_use]
    pub fn score(&self, triad: &Triad) -> f64 {
        let w = &self.weights;
        w.balance * triad.balance() + w.smallness * triad.smallness() + w.harmony * triad.harmony()
    }

    /// The canonical triad for `target`, or `None` if `D(target)` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`CalculusError::InvalidPrime`](crate::CalculusError::InvalidPrime) if `target` is not prime.
    pub fn canonical(&self, target: u64) -> Result<Option<Triad>> {
        let triads = self.triads(target)?;
        let mut best: Option<(Triad, f64)> = None;
        // Triads arrive in lexicographic order, so keeping the first of
        // equal scores implements the tie-break.
        for &triad in triads.iter() {
            let score = self.score(&triad);
            match best {
                Some((_, top)) if score <= top + SCORE_EPSILON => {}
                _ => best = Some((triad, score)),
            }
        }
        Ok(best.map(|(triad, _)| triad))
    }

    /// Rewrites every well-formed fusion in `term` to the canonical triad
    /// of its sum. Other subterms are left unchanged.
    ///
    /// # Errors
    ///
    /// Propagates [`CalculusError::InvalidPrime`](crate::CalculusError::InvalidPrime) from term construction.
    pub fn canonicalize(&self, term: &Term) -> Result<Term> {
        Ok(match term {
            Term::Noun(_) | Term::Adj(_) => term.clone(),
            Term::Fusion(fusion) => self.canonical_fusion(fusion)?,
            Term::Chain(chain) => Term::chain(
                chain
                    .operators()
                    .iter()
                    .map(|op| self.canonicalize(op))
                    .collect::<Result<Vec<_>>>()?,
                self.canonicalize(chain.noun())?,
            ),
            Term::NounSentence(e) => Term::sentence(self.canonicalize(e)?),
            Term::Seq(l, r) => Term::seq(self.canonicalize(l)?, self.canonicalize(r)?),
            Term::Impl(a, c) => Term::implies(self.canonicalize(a)?, self.canonicalize(c)?),
        })
    }

    fn canonical_fusion(&self, fusion: &Fusion) -> Result<Term> {
        let Ok(sum) = fusion.fused() else {
            return Ok(Term::Fusion(*fusion));
        };
        match self.canonical(sum.get())? {
            Some(triad) => triad.to_term(),
            None => Ok(Term::Fusion(*fusion)),
        }
    }
}

fn enumerate(target: u64) -> Vec<Triad> {
    let mut triads = Vec::new();
    let mut p: u64 = 3;
    // p < q < r forces 3p < target and p + 2q < target.
    while p.saturating_mul(3) < target {
        let mut q = next_prime_after(p).unwrap_or(u64::MAX);
        while p.saturating_add(q.saturating_mul(2)) < target {
            let r = target - p - q;
            if is_prime(r) {
                if let (Ok(p), Ok(q), Ok(r)) = (Prime::new(p), Prime::new(q), Prime::new(r)) {
                    triads.push(Triad { p, q, r });
                }
            }
            q = next_prime_after(q).unwrap_or(u64::MAX);
        }
        p = next_prime_after(p).unwrap_or(u64::MAX);
    }
    triads
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triad(p: u64, q: u64, r: u64) -> Triad {
        Triad {
            p: Prime::new(p).unwrap(),
            q: Prime::new(q).unwrap(),
            r: Prime::new(r).unwrap(),
        }
    }

    #[test]
    fn enumerates_decompositions() {
        let c = FusionCanonicalizer::new();
        let d19: Vec<_> = c.triads(19).unwrap().to_vec();
        assert_eq!(d19, vec![triad(3, 5, 11)]);
        let d23: Vec<_> = c.triads(23).unwrap().to_vec();
        assert_eq!(d23, vec![triad(3, 7, 13), triad(5, 7, 11)]);
        assert!(c.triads(13).unwrap().is_empty());
        assert!(c.triads(21).is_err());
    }

    #[test]
    fn every_triad_is_a_valid_fusion() {
        let c = FusionCanonicalizer::new();
        for &t in c.triads(101).unwrap().iter() {
            assert_eq!(t.sum(), 101);
            assert!(t.p < t.q && t.q < t.r);
            assert!(t.p.is_odd());
            let term = t.to_term().unwrap();
            assert!(term.is_reducible());
        }
    }

    #[test]
    fn memoizes_per_target() {
        let c = FusionCanonicalizer::new();
        assert_eq!(c.cached_targets(), 0);
        let first = c.triads(97).unwrap();
        let second = c.triads(97).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(c.cached_targets(), 1);
    }

    #[test]
    fn prefers_balanced_triads() {
        let c = FusionCanonicalizer::new();
        // (5,7,11) has variance 6.2 against 16.9 for (3,7,13).
        assert_eq!(c.canonical(23).unwrap(), Some(triad(5, 7, 11)));
        assert_eq!(c.canonical(19).unwrap(), Some(triad(3, 5, 11)));
        assert_eq!(c.canonical(11).unwrap(), None);
    }

    #[test]
    fn ties_break_lexicographically() {
        let c = FusionCanonicalizer::with_weights(CanonicalWeights {
            balance: 0.0,
            smallness: 0.0,
            harmony: 0.0,
        });
        assert_eq!(c.canonical(23).unwrap(), Some(triad(3, 7, 13)));
    }

    #[test]
    fn canonicalize_rewrites_fusions() {
        let c = FusionCanonicalizer::new();
        let term = Term::seq(
            Term::sentence(Term::fuse(3, 7, 13).unwrap()),
            Term::sentence(Term::chain(
                vec![Term::adj(2).unwrap()],
                Term::fuse(11, 7, 5).unwrap(),
            )),
        );
        let canonical = c.canonicalize(&term).unwrap();
        assert_eq!(
            canonical.to_string(),
            "([FUSE(5,7,11)] ; [A(2)FUSE(5,7,11)])"
        );
        // Ill-formed fusions are left alone.
        let ill = Term::fuse(3, 5, 7).unwrap();
        assert_eq!(c.canonicalize(&ill).unwrap(), ill);
    }
}
