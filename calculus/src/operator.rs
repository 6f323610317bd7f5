//! Prime operators (⊕): the binary operation chains apply.
//!
//! Every strategy shares the canonical contract: `can_apply(p, q)` holds iff
//! both arguments are prime and `p < q`, and `apply` fails with
//! [`CalculusError::OperatorDomain`] outside that domain. Strategies are
//! pure functions of their arguments and are injected explicitly into the
//! reduction engine, the translator, and the evaluator.
//!
//! | Strategy | `p ⊕ q` |
//! |----------|---------|
//! | [`ResonancePrimeOperator`] | prime nearest `round(q·ln q / ln p)` |
//! | [`NextPrimeOperator`] | smallest prime `≥ p + q` |
//! | [`ModularPrimeOperator`] | smallest prime `≥ (p·q) mod base` |
//! | [`IdentityPrimeOperator`] | `q` |
//!
//! # Examples
//!
//! ```
//! use prime_calculus::operator::{NextPrimeOperator, PrimeOperator};
//!
//! let op = NextPrimeOperator;
//! assert!(op.can_apply(3, 7));
//! assert!(!op.can_apply(7, 3));
//! assert_eq!(op.apply(3, 7)?.get(), 11);
//! assert!(op.apply(7, 3).is_err());
//! # Ok::<(), prime_calculus::CalculusError>(())
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{CalculusError, Result};
use crate::prime::{is_prime, next_prime, next_prime_after, Prime};

/// Offsets searched around the resonance target before falling back.
pub const RESONANCE_SEARCH_RADIUS: u64 = 1000;

/// Default modulus for [`ModularPrimeOperator`].
pub const DEFAULT_MODULUS: u64 = 1_000_003;

/// A binary operation on primes.
pub trait PrimeOperator: fmt::Debug + Send + Sync {
    /// Short, stable name of the strategy.
    fn name(&self) -> &'static str;

    /// Domain predicate: both prime and `p < q`.
    fn can_apply(&self, p: u64, q: u64) -> bool {
        p < q && is_prime(p) && is_prime(q)
    }

    /// Computes `p ⊕ q`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculusError::OperatorDomain`] if `can_apply(p, q)` is
    /// false or the result does not fit in a `u64`.
    fn apply(&self, p: u64, q: u64) -> Result<Prime>;
}

fn domain_error<O: PrimeOperator + ?Sized>(op: &O, p: u64, q: u64) -> CalculusError {
    CalculusError::OperatorDomain {
        operator: op.name(),
        p,
        q,
    }
}

fn ensure_domain<O: PrimeOperator + ?Sized>(op: &O, p: u64, q: u64) -> Result<()> {
    if op.can_apply(p, q) {
        Ok(())
    } else {
        Err(domain_error(op, p, q))
    }
}

fn to_prime<O: PrimeOperator + ?Sized>(op: &O, p: u64, q: u64, n: Option<u64>) -> Result<Prime> {
    n.and_then(|n| Prime::new(n).ok())
        .ok_or_else(|| domain_error(op, p, q))
}

/// Smallest prime at or above `q + p`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NextPrimeOperator;

impl PrimeOperator for NextPrimeOperator {
    fn name(&self) -> &'static str {
        "next-prime"
    }

    fn apply(&self, p: u64, q: u64) -> Result<Prime> {
        ensure_domain(self, p, q)?;
        to_prime(self, p, q, q.checked_add(p).and_then(next_prime))
    }
}

/// Base of [`ModularPrimeOperator`], at least 2.
///
/// A base of 1 would send every product to residue 0 and every result to 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u64", into = "u64")
)]
pub struct Modulus(u64);

impl Modulus {
    /// [`DEFAULT_MODULUS`].
    pub const DEFAULT: Self = Self(DEFAULT_MODULUS);

    /// Validates a base.
    ///
    /// # Errors
    ///
    /// Returns [`CalculusError::InvalidModulus`] if `base < 2`.
    pub fn new(base: u64) -> Result<Self> {
        if base < 2 {
            return Err(CalculusError::InvalidModulus { value: base });
        }
        Ok(Self(base))
    }

    /// The base.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Default for Modulus {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u64> for Modulus {
    type Error = CalculusError;

    fn try_from(base: u64) -> Result<Self> {
        Self::new(base)
    }
}

impl From<Modulus> for u64 {
    fn from(modulus: Modulus) -> Self {
        modulus.0
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Modulus {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let base: u64 = s.parse().map_err(|err| format!("invalid modulus '{s}': {err}"))?;
        Self::new(base).map_err(|err| err.to_string())
    }
}

/// Smallest prime at or above `(p·q) mod base`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModularPrimeOperator {
    base: Modulus,
}

impl ModularPrimeOperator {
    /// Creates the operator for a modulus.
    #[must_use]
    pub const fn new(base: Modulus) -> Self {
        Self { base }
    }

    /// The modulus.
    #[must_use]
    pub const fn base(&self) -> u64 {
        self.base.get()
    }
}

impl PrimeOperator for ModularPrimeOperator {
    fn name(&self) -> &'static str {
        "modular"
    }

    fn apply(&self, p: u64, q: u64) -> Result<Prime> {
        ensure_domain(self, p, q)?;
        let residue = (u128::from(p) * u128::from(q)) % u128::from(self.base.get());
        // The residue is below `base`, so it fits back into a u64.
        to_prime(self, p, q, next_prime(residue as u64))
    }
}

/// Prime nearest to `round(q·ln q / ln p)`.
///
/// The search alternates `target + k`, `target - k` for growing `k` and
/// falls back to the next prime after `q` if nothing is found within
/// [`RESONANCE_SEARCH_RADIUS`] offsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResonancePrimeOperator;

impl ResonancePrimeOperator {
    fn target(p: u64, q: u64) -> Option<u64> {
        let (p, q) = (p as f64, q as f64);
        let target = (q * q.ln() / p.ln()).round();
        if target.is_finite() && target >= 0.0 && target < u64::MAX as f64 {
            Some(target as u64)
        } else {
            None
        }
    }

    fn nearest_prime(target: u64) -> Option<u64> {
        (0..RESONANCE_SEARCH_RADIUS).find_map(|offset| {
            let above = target.checked_add(offset).filter(|&n| is_prime(n));
            above.or_else(|| target.checked_sub(offset).filter(|&n| is_prime(n)))
        })
    }
}

impl PrimeOperator for ResonancePrimeOperator {
    fn name(&self) -> &'static str {
        "resonance"
    }

    fn apply(&self, p: u64, q: u64) -> Result<Prime> {
        ensure_domain(self, p, q)?;
        let found = Self::target(p, q)
            .and_then(Self::nearest_prime)
            .or_else(|| next_prime_after(q));
        to_prime(self, p, q, found)
    }
}

/// Returns `q` unchanged.
///
/// The identity is defined on every pair of primes, in either order, which
/// makes it a left zero for chains: `A(p1)…A(pk)N(q)` always normalizes to
/// `N(q)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPrimeOperator;

impl PrimeOperator for IdentityPrimeOperator {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn can_apply(&self, p: u64, q: u64) -> bool {
        is_prime(p) && is_prime(q)
    }

    fn apply(&self, p: u64, q: u64) -> Result<Prime> {
        ensure_domain(self, p, q)?;
        Prime::new(q)
    }
}

/// How [`apply_oriented`] combined an adjective with a noun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Orientation {
    /// `adj ⊕ noun`.
    Forward,
    /// `noun ⊕ adj`, because the forward order was outside the domain.
    Swapped,
    /// `max(adj, noun)`, because neither order was in the domain.
    Fallback,
}

/// Result of combining an adjective with a noun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Combination {
    /// The new noun prime.
    pub result: Prime,
    /// Which order was used.
    pub orientation: Orientation,
}

/// Applies adjective `adj` to noun `noun` under `op`.
///
/// Tries `adj ⊕ noun`, then `noun ⊕ adj`, then falls back to
/// `max(adj, noun)`. The reduction engine and the lambda evaluator both go
/// through this function so their ordering rules cannot drift apart.
///
/// # Errors
///
/// Propagates [`CalculusError::OperatorDomain`] if the operator accepts an
/// order but cannot produce a result (overflow).
pub fn apply_oriented(op: &dyn PrimeOperator, adj: Prime, noun: Prime) -> Result<Combination> {
    let (a, n) = (adj.get(), noun.get());
    let (result, orientation) = if op.can_apply(a, n) {
        (op.apply(a, n)?, Orientation::Forward)
    } else if op.can_apply(n, a) {
        (op.apply(n, a)?, Orientation::Swapped)
    } else {
        (adj.max(noun), Orientation::Fallback)
    };
    Ok(Combination {
        result,
        orientation,
    })
}

/// The built-in operator strategies, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum OperatorKind {
    /// [`ResonancePrimeOperator`].
    #[default]
    Resonance,
    /// [`NextPrimeOperator`].
    NextPrime,
    /// [`ModularPrimeOperator`].
    Modular,
    /// [`IdentityPrimeOperator`].
    Identity,
}

impl OperatorKind {
    /// Every built-in strategy.
    pub const ALL: [OperatorKind; 4] = [
        OperatorKind::Resonance,
        OperatorKind::NextPrime,
        OperatorKind::Modular,
        OperatorKind::Identity,
    ];

    /// Instantiates the strategy; `modulus` is used only by
    /// [`OperatorKind::Modular`].
    #[must_use]
    pub fn build(self, modulus: Modulus) -> Arc<dyn PrimeOperator> {
        match self {
            Self::Resonance => Arc::new(ResonancePrimeOperator),
            Self::NextPrime => Arc::new(NextPrimeOperator),
            Self::Modular => Arc::new(ModularPrimeOperator::new(modulus)),
            Self::Identity => Arc::new(IdentityPrimeOperator),
        }
    }

    /// The name reported by the built operator.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Resonance => "resonance",
            Self::NextPrime => "next-prime",
            Self::Modular => "modular",
            Self::Identity => "identity",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperatorKind {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                format!("unknown operator '{s}' (expected resonance, next-prime, modular, or identity)")
            })
    }
}

/// The default strategy, [`ResonancePrimeOperator`].
#[must_use]
pub fn default_operator() -> Arc<dyn PrimeOperator> {
    Arc::new(ResonancePrimeOperator)
}
