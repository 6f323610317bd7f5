//! Sentence fixtures: atomic sentences, sequences, and implications.

use prime_calculus::types::TypeKind;

use super::Fixture;

/// Sentence-typed fixtures.
pub const SENTENCES: &[Fixture] = &[
    Fixture {
        name: "atomic",
        source: "[A(2)A(3)N(7)]",
        kind: TypeKind::Sentence,
        normal_form: "[N(13)]",
    },
    Fixture {
        name: "atomic-nested",
        source: "[A(3)(A(5)N(7))]",
        kind: TypeKind::Sentence,
        normal_form: "[N(17)]",
    },
    Fixture {
        name: "sequence",
        source: "([N(2)] ; [FUSE(3,5,11)])",
        kind: TypeKind::Sentence,
        normal_form: "([N(2)] ; [N(19)])",
    },
    Fixture {
        name: "implication",
        source: "([A(3)N(7)] => [A(2)N(11)])",
        kind: TypeKind::Sentence,
        normal_form: "([N(11)] => [N(13)])",
    },
    Fixture {
        name: "compound",
        source: "(([A(7)N(3)] ; [N(5)]) => [A(13)FUSE(5,7,11)])",
        kind: TypeKind::Sentence,
        normal_form: "(([N(11)] ; [N(5)]) => [N(37)])",
    },
];
