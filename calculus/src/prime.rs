//! Prime oracle: primality, enumeration, and the validated [`Prime`] newtype.
//!
//! The calculus consumes exactly two capabilities from prime arithmetic,
//! [`is_prime`] and [`first_n_primes`]. The operators additionally scan for
//! the next prime with [`next_prime`] and [`next_prime_after`], which are
//! built on [`is_prime`].
//!
//! # Examples
//!
//! ```
//! use prime_calculus::prime::{first_n_primes, is_prime, Prime};
//!
//! assert!(is_prime(19));
//! assert!(!is_prime(21));
//! assert_eq!(first_n_primes(5), vec![2, 3, 5, 7, 11]);
//! assert!(Prime::new(4).is_err());
//! ```

use std::fmt;
use std::sync::{PoisonError, RwLock};

use crate::error::{CalculusError, Result};

/// Primes below 64, used for trial division and as Miller–Rabin bases.
const SMALL_PRIMES: [u64; 18] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61,
];

/// Bases that make Miller–Rabin deterministic for every `u64`.
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Enumerated primes, grown on demand by [`first_n_primes`].
static ENUMERATED: RwLock<Vec<u64>> = RwLock::new(Vec::new());

/// Deterministic primality test for the full `u64` range.
#[must_use]
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for &p in &SMALL_PRIMES {
        if n == p {
            return true;
        }
        if n % p == 0 {
            return false;
        }
    }
    if n < 61 * 61 {
        return true;
    }
    miller_rabin(n)
}

fn miller_rabin(n: u64) -> bool {
    let mut d = n - 1;
    let mut s = 0u32;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }
    'witness: for &a in &WITNESSES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((u128::from(a) * u128::from(b)) % u128::from(m)) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1u64;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    acc
}

/// Smallest prime `≥ n`, or `None` if it does not fit in a `u64`.
#[must_use]
pub fn next_prime(n: u64) -> Option<u64> {
    let mut candidate = n.max(2);
    loop {
        if is_prime(candidate) {
            return Some(candidate);
        }
        candidate = candidate.checked_add(1)?;
    }
}

/// Smallest prime `> n`, or `None` if it does not fit in a `u64`.
#[must_use]
pub fn next_prime_after(n: u64) -> Option<u64> {
    next_prime(n.checked_add(1)?)
}

/// The first `k` primes in ascending order.
///
/// Results are memoized process-wide; concurrent callers share the table
/// under a read/write lock.
#[must_use]
pub fn first_n_primes(k: usize) -> Vec<u64> {
    {
        let table = ENUMERATED.read().unwrap_or_else(PoisonError::into_inner);
        if table.len() >= k {
            return table[..k].to_vec();
        }
    }
    let mut table = ENUMERATED.write().unwrap_or_else(PoisonError::into_inner);
    let mut candidate = table.last().map_or(2, |&p| p + 1);
    while table.len() < k {
        if is_prime(candidate) {
            table.push(candidate);
        }
        candidate += 1;
    }
    table[..k].to_vec()
}

/// An integer known to be prime.
///
/// The only way to obtain a `Prime` is through [`Prime::new`] (or
/// `TryFrom<u64>`), so every noun, adjective, and fusion position holds a
/// validated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u64", into = "u64")
)]
pub struct Prime(u64);

impl Prime {
    /// Validates `n` as a prime.
    ///
    /// # Errors
    ///
    /// Returns [`CalculusError::InvalidPrime`] if `n` is not prime.
    pub fn new(n: u64) -> Result<Self> {
        if is_prime(n) {
            Ok(Self(n))
        } else {
            Err(CalculusError::not_prime(n))
        }
    }

    /// The underlying integer.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// True for every prime except 2.
    #[inline]
    #[must_use]
    pub const fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }
}

impl TryFrom<u64> for Prime {
    type Error = CalculusError;

    fn try_from(n: u64) -> Result<Self> {
        Self::new(n)
    }
}

impl From<Prime> for u64 {
    fn from(p: Prime) -> Self {
        p.0
    }
}

impl fmt::Display for Prime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
