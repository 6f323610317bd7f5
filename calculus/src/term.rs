//! Term algebra: nouns, adjectives, chains, fusions, and sentences.
//!
//! Terms are immutable. Reduction and substitution build new terms and never
//! mutate existing ones, so independent terms can be processed from
//! different threads without coordination.
//!
//! | Notation | Variant | Role |
//! |----------|---------|------|
//! | `N(p)` | [`Term::Noun`] | value, normal form |
//! | `A(p)` | [`Term::Adj`] | operator, stuck alone |
//! | `A(p1)...A(pk)N(q)` | [`Term::Chain`] | operators applied right to left |
//! | `FUSE(p,q,r)` | [`Term::Fusion`] | reduces to `N(p+q+r)` |
//! | `[e]` | [`Term::NounSentence`] | sentence over a noun expression |
//! | `(s ; t)` | [`Term::Seq`] | sequential composition |
//! | `(s => t)` | [`Term::Impl`] | implication |
//!
//! # Examples
//!
//! ```
//! use prime_calculus::Term;
//!
//! let chain = Term::chain(vec![Term::adj(2)?, Term::adj(3)?], Term::noun(7)?);
//! assert_eq!(chain.to_string(), "A(2)A(3)N(7)");
//! assert_eq!(chain.term_size(), 3);
//! assert!(chain.is_reducible());
//!
//! let fusion = Term::fuse(3, 5, 11)?;
//! assert!(fusion.is_reducible());
//! assert!(Term::fuse(3, 3, 5).is_err());
//! # Ok::<(), prime_calculus::CalculusError>(())
//! ```

use std::fmt;

use crate::error::{CalculusError, Result};
use crate::prime::{is_prime, Prime};

/// A calculus expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Term {
    /// `N(p)`: a noun, the only normal form.
    Noun(Prime),
    /// `A(p)`: an adjective, an operator waiting for a noun.
    Adj(Prime),
    /// Operators applied to a noun position.
    Chain(Chain),
    /// A ternary fusion of distinct odd primes.
    Fusion(Fusion),
    /// A sentence wrapping one expression.
    NounSentence(Box<Term>),
    /// Sequential composition of two sentences.
    Seq(Box<Term>, Box<Term>),
    /// Implication between two sentences.
    Impl(Box<Term>, Box<Term>),
}

/// Operators applied to a noun position, innermost (rightmost) first.
///
/// A chain always holds at least one operator: [`Term::chain`] collapses an
/// empty operator list to the bare noun.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Chain {
    operators: Vec<Term>,
    noun: Box<Term>,
}

impl Chain {
    /// Operators in written order; the last one applies first.
    #[must_use]
    pub fn operators(&self) -> &[Term] {
        &self.operators
    }

    /// The noun position.
    #[must_use]
    pub fn noun(&self) -> &Term {
        &self.noun
    }

    /// Splits off the innermost operator, returning it together with the
    /// remaining operators.
    #[must_use]
    pub fn split_innermost(&self) -> Option<(&Term, &[Term])> {
        self.operators.split_last()
    }

    /// Rebuilds the chain around a new noun position.
    #[must_use]
    pub fn with_noun(&self, noun: Term) -> Term {
        Term::chain(self.operators.clone(), noun)
    }
}

/// `FUSE(p,q,r)`: three distinct odd primes.
///
/// Construction only enforces distinctness and oddness; whether the sum is
/// prime is checked separately by [`Fusion::is_well_formed`], because an
/// ill-formed fusion is a legitimate (if irreducible) value of the algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Fusion {
    p: Prime,
    q: Prime,
    r: Prime,
}

impl Fusion {
    /// Validates a fusion triple.
    ///
    /// # Errors
    ///
    /// Returns [`CalculusError::InvalidPrime`] if a component is not prime,
    /// is 2, or repeats another component.
    pub fn new(p: u64, q: u64, r: u64) -> Result<Self> {
        let p = odd_prime(p)?;
        let q = odd_prime(q)?;
        let r = odd_prime(r)?;
        if p == q || q == r || p == r {
            let repeated = if p == q || p == r { p } else { q };
            return Err(CalculusError::InvalidPrime {
                value: repeated.get(),
                reason: "fusion components must be distinct",
            });
        }
        Ok(Self { p, q, r })
    }

    /// The three components in construction order.
    #[must_use]
    pub const fn components(&self) -> (Prime, Prime, Prime) {
        (self.p, self.q, self.r)
    }

    /// `p + q + r`, or `None` on overflow.
    #[must_use]
    pub fn sum(&self) -> Option<u64> {
        self.p
            .get()
            .checked_add(self.q.get())?
            .checked_add(self.r.get())
    }

    /// True iff `p + q + r` is prime.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.sum().is_some_and(is_prime)
    }

    /// The fused prime.
    ///
    /// # Errors
    ///
    /// Returns [`CalculusError::IllFormedFusion`] if the sum is not prime.
    pub fn fused(&self) -> Result<Prime> {
        self.sum()
            .and_then(|s| Prime::new(s).ok())
            .ok_or(CalculusError::IllFormedFusion {
                p: self.p.get(),
                q: self.q.get(),
                r: self.r.get(),
                sum: self
                    .p
                    .get()
                    .saturating_add(self.q.get())
                    .saturating_add(self.r.get()),
            })
    }
}

fn odd_prime(n: u64) -> Result<Prime> {
    let p = Prime::new(n)?;
    if p.is_odd() {
        Ok(p)
    } else {
        Err(CalculusError::InvalidPrime {
            value: n,
            reason: "fusion components must be odd",
        })
    }
}

impl Term {
    /// `N(p)`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculusError::InvalidPrime`] if `p` is not prime.
    pub fn noun(p: u64) -> Result<Self> {
        Prime::new(p).map(Self::Noun)
    }

    /// `A(p)`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculusError::InvalidPrime`] if `p` is not prime.
    pub fn adj(p: u64) -> Result<Self> {
        Prime::new(p).map(Self::Adj)
    }

    /// `FUSE(p,q,r)`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculusError::InvalidPrime`] unless `p`, `q`, `r` are
    /// distinct odd primes.
    pub fn fuse(p: u64, q: u64, r: u64) -> Result<Self> {
        Fusion::new(p, q, r).map(Self::Fusion)
    }

    /// `operators noun`; the bare `noun` when `operators` is empty.
    ///
    /// Operator and noun shapes are not restricted here: a chain whose
    /// operator position holds a noun is representable and rejected by the
    /// [`TypeChecker`](crate::TypeChecker).
    #[must_use]
    pub fn chain(operators: Vec<Term>, noun: Term) -> Self {
        if operators.is_empty() {
            noun
        } else {
            Self::Chain(Chain {
                operators,
                noun: Box::new(noun),
            })
        }
    }

    /// `A(ops[0])...A(ops[k-1])N(noun)` from raw integers.
    ///
    /// # Errors
    ///
    /// Returns [`CalculusError::InvalidPrime`] if any argument is not prime.
    pub fn chain_of(operators: &[u64], noun: u64) -> Result<Self> {
        let operators = operators
            .iter()
            .map(|&p| Self::adj(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::chain(operators, Self::noun(noun)?))
    }

    /// `[expr]`.
    #[must_use]
    pub fn sentence(expr: Term) -> Self {
        Self::NounSentence(Box::new(expr))
    }

    /// `(left ; right)`.
    #[must_use]
    pub fn seq(left: Term, right: Term) -> Self {
        Self::Seq(Box::new(left), Box::new(right))
    }

    /// `(antecedent => consequent)`.
    #[must_use]
    pub fn implies(antecedent: Term, consequent: Term) -> Self {
        Self::Impl(Box::new(antecedent), Box::new(consequent))
    }

    /// True only for `N(p)`.
    #[must_use]
    pub fn is_normal_form(&self) -> bool {
        matches!(self, Self::Noun(_))
    }

    /// True for sentence variants.
    #[must_use]
    pub fn is_sentence(&self) -> bool {
        matches!(self, Self::NounSentence(_) | Self::Seq(..) | Self::Impl(..))
    }

    /// Whether some reduction rule applies somewhere in this term.
    ///
    /// Chains are reducible whenever they hold an operator, even if the
    /// reduction itself would then fail on an ill-typed operator.
    #[must_use]
    pub fn is_reducible(&self) -> bool {
        match self {
            Self::Noun(_) | Self::Adj(_) => false,
            Self::Chain(_) => true,
            Self::Fusion(f) => f.is_well_formed(),
            Self::NounSentence(e) => e.is_reducible(),
            Self::Seq(l, r) | Self::Impl(l, r) => l.is_reducible() || r.is_reducible(),
        }
    }

    /// Structural size: 1 for atoms, operators plus noun size for chains,
    /// propagated or summed through sentences.
    ///
    /// FUSE maps a fusion (size 1) to a noun (size 1), so this size alone
    /// is not a termination measure; see [`Term::reduction_measure`].
    #[must_use]
    pub fn term_size(&self) -> usize {
        self.measure(1)
    }

    /// Well-founded measure that strictly decreases on every rule,
    /// including FUSE: identical to [`Term::term_size`] except that a
    /// fusion counts 2.
    #[must_use]
    pub fn reduction_measure(&self) -> usize {
        self.measure(2)
    }

    fn measure(&self, fusion_weight: usize) -> usize {
        match self {
            Self::Noun(_) | Self::Adj(_) => 1,
            Self::Fusion(_) => fusion_weight,
            Self::Chain(c) => c.operators.len() + c.noun.measure(fusion_weight),
            Self::NounSentence(e) => e.measure(fusion_weight),
            Self::Seq(l, r) | Self::Impl(l, r) => {
                l.measure(fusion_weight) + r.measure(fusion_weight)
            }
        }
    }

    /// The prime of a noun.
    #[must_use]
    pub fn as_noun(&self) -> Option<Prime> {
        match self {
            Self::Noun(p) => Some(*p),
            _ => None,
        }
    }

    /// Canonical textual form, used for structural comparison.
    #[must_use]
    pub fn signature(&self) -> String {
        self.to_string()
    }

    /// Short name of the variant.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Noun(_) => "noun",
            Self::Adj(_) => "adjective",
            Self::Chain(_) => "chain",
            Self::Fusion(_) => "fusion",
            Self::NounSentence(_) => "noun sentence",
            Self::Seq(..) => "sequence",
            Self::Impl(..) => "implication",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Noun(p) => write!(f, "N({p})"),
            Self::Adj(p) => write!(f, "A({p})"),
            Self::Fusion(fusion) => write!(f, "{fusion}"),
            Self::Chain(chain) => write!(f, "{chain}"),
            Self::NounSentence(e) => write!(f, "[{e}]"),
            Self::Seq(l, r) => write!(f, "({l} ; {r})"),
            Self::Impl(l, r) => write!(f, "({l} => {r})"),
        }
    }
}

impl fmt::Display for Fusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FUSE({},{},{})", self.p, self.q, self.r)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Nested chains are parenthesized so the printed form parses back
        // to the same tree.
        for op in self.operators.iter().chain(core::iter::once(&*self.noun)) {
            match op {
                Term::Chain(_) => write!(f, "({op})")?,
                _ => write!(f, "{op}")?,
            }
        }
        Ok(())
    }
}
