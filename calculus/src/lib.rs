//! Prime Calculus: a typed term calculus over prime-indexed nouns and
//! adjectives.
//!
//! Terms are built from nouns `N(p)` and adjectives `A(p)` indexed by
//! primes, chains of adjectives applied to a noun, ternary fusions
//! `FUSE(p,q,r)`, and sentences composing them. The crate gives the calculus
//! two independent meanings and checks that they agree:
//!
//! - **operational**: the [`ReductionSystem`] rewrites terms with the FUSE and
//!   APPLY rules until no rule applies;
//! - **denotational**: the [`lambda`] layer translates terms into a
//!   call-by-value lambda calculus and evaluates them.
//!
//! # Components
//!
//! | Module | Role |
//! |--------|------|
//! | [`prime`] | primality oracle and the [`Prime`] newtype |
//! | [`term`] | the term algebra |
//! | [`types`] | noun, adjective, and sentence types; the checker |
//! | [`operator`] | the ⊕ strategies chains apply |
//! | [`reduction`] | the engine, canonical fusion triads, verification |
//! | [`lambda`] | translation τ and the lambda evaluator |
//! | [`semantics`] | the two semantics side by side |
//! | [`syntax`] | the textual notation |
//! | [`config`] | [`EngineConfig`] |
//!
//! Every component takes its [`PrimeOperator`](operator::PrimeOperator)
//! explicitly; there is no process-wide default beyond the
//! [`default_operator`](operator::default_operator) constructor.
//!
//! # Example
//!
//! ```
//! use prime_calculus::operator::NextPrimeOperator;
//! use prime_calculus::{parse_term, ReductionSystem, Semantics, TypeChecker, TypingContext};
//! use std::sync::Arc;
//!
//! let term = parse_term("A(2)A(3)N(7)")?;
//! TypeChecker::new().check(&term, &TypingContext::new())?;
//!
//! // 3 ⊕ 7 = 11, then 2 ⊕ 11 = 13
//! let engine = ReductionSystem::new(Arc::new(NextPrimeOperator));
//! assert_eq!(engine.evaluate(&term)?.to_string(), "N(13)");
//!
//! let semantics = Semantics::new(Arc::new(NextPrimeOperator));
//! let agreement = semantics.verify_semantic_equivalence(&term)?;
//! assert_eq!(agreement.value().map(|p| p.get()), Some(13));
//! # Ok::<(), prime_calculus::CalculusError>(())
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize` for terms, types, traces, and lambda expressions;
//!   `Serialize`/`Deserialize` for [`EngineConfig`].

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod error;
pub mod lambda;
pub mod operator;
pub mod prime;
pub mod reduction;
pub mod semantics;
pub mod syntax;
pub mod term;
pub mod types;

pub use config::EngineConfig;
pub use error::{CalculusError, Result};
pub use operator::{OperatorKind, PrimeOperator};
pub use prime::Prime;
pub use reduction::{
    FusionCanonicalizer, ReductionStep, ReductionSystem, ReductionTrace, Rule, Strategy,
};
pub use semantics::{SemanticAgreement, Semantics};
pub use syntax::parse_term;
pub use term::Term;
pub use types::{SentenceType, Type, TypeChecker, TypingContext, TypingJudgment};
