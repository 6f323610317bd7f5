//! Equivalence verdicts under the expectation operator.

use super::EquivalencePair;

/// Pairs of noun expressions with their expected verdict.
pub const EQUIVALENCE_PAIRS: &[EquivalencePair] = &[
    EquivalencePair {
        left: "A(3)N(7)",
        right: "N(11)",
        equivalent: true,
    },
    EquivalencePair {
        left: "A(7)N(3)",
        right: "A(3)N(7)",
        equivalent: true,
    },
    EquivalencePair {
        left: "FUSE(3,5,11)",
        right: "A(7)N(11)",
        equivalent: true,
    },
    EquivalencePair {
        left: "A(13)FUSE(5,7,11)",
        right: "N(37)",
        equivalent: true,
    },
    EquivalencePair {
        left: "N(2)",
        right: "N(3)",
        equivalent: false,
    },
    EquivalencePair {
        left: "A(5)N(5)",
        right: "N(7)",
        equivalent: false,
    },
];
