//! Noun expressions, plus one bare adjective.
//!
//! Covers each APPLY orientation: forward (`A(3)N(7)`), swapped
//! (`A(7)N(3)`), and the `max` fallback (`A(5)N(5)`).

use prime_calculus::types::TypeKind;

use super::Fixture;

/// Noun-typed fixtures and the adjective atom.
pub const NOUNS: &[Fixture] = &[
    Fixture {
        name: "noun",
        source: "N(7)",
        kind: TypeKind::Noun,
        normal_form: "N(7)",
    },
    Fixture {
        name: "adjective",
        source: "A(3)",
        kind: TypeKind::Adj,
        normal_form: "A(3)",
    },
    Fixture {
        name: "apply-forward",
        source: "A(3)N(7)",
        kind: TypeKind::Noun,
        normal_form: "N(11)",
    },
    Fixture {
        name: "apply-swapped",
        source: "A(7)N(3)",
        kind: TypeKind::Noun,
        normal_form: "N(11)",
    },
    Fixture {
        name: "apply-fallback",
        source: "A(5)N(5)",
        kind: TypeKind::Noun,
        normal_form: "N(5)",
    },
    Fixture {
        name: "chain",
        source: "A(2)A(3)N(7)",
        kind: TypeKind::Noun,
        normal_form: "N(13)",
    },
    Fixture {
        name: "nested-chain",
        source: "A(3)(A(5)N(7))",
        kind: TypeKind::Noun,
        normal_form: "N(17)",
    },
    Fixture {
        name: "fusion",
        source: "FUSE(3,5,11)",
        kind: TypeKind::Noun,
        normal_form: "N(19)",
    },
    Fixture {
        name: "fusion-under-adjective",
        source: "A(13)FUSE(5,7,11)",
        kind: TypeKind::Noun,
        normal_form: "N(37)",
    },
];
