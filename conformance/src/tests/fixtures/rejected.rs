//! Inputs that must be rejected, by the type checker or by the parser.

use super::{IllTyped, Malformed};

/// Parseable terms the type checker rejects.
pub const ILL_TYPED: &[IllTyped] = &[
    IllTyped {
        name: "noun-as-operator",
        source: "N(3)N(7)",
        error: "type-mismatch",
    },
    IllTyped {
        name: "adjective-as-noun",
        source: "A(3)A(5)",
        error: "type-mismatch",
    },
    IllTyped {
        name: "sentence-as-noun",
        source: "A(3)[N(7)]",
        error: "type-mismatch",
    },
    IllTyped {
        name: "adjective-sentence",
        source: "[A(3)]",
        error: "type-mismatch",
    },
    IllTyped {
        name: "sequence-of-nouns",
        source: "(N(2) ; N(3))",
        error: "type-mismatch",
    },
    IllTyped {
        name: "composite-fusion",
        source: "FUSE(3,5,7)",
        error: "ill-formed-fusion",
    },
    IllTyped {
        name: "composite-fusion-in-chain",
        source: "A(2)FUSE(3,7,11)",
        error: "ill-formed-fusion",
    },
];

/// Malformed text and the byte offset the parser must report.
pub const MALFORMED: &[Malformed] = &[
    Malformed {
        source: "",
        position: 0,
    },
    Malformed {
        source: "N(4)",
        position: 0,
    },
    Malformed {
        source: "A(2",
        position: 3,
    },
    Malformed {
        source: "FUSE(3,5)",
        position: 8,
    },
    Malformed {
        source: "(N(2) ; N(3)",
        position: 12,
    },
    Malformed {
        source: "N(7) x",
        position: 5,
    },
    Malformed {
        source: "[N(7)",
        position: 5,
    },
];
