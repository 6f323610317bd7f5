//! The lambda translation layer: an independent calculus that gives terms a
//! denotational meaning.
//!
//! A term is translated by [`Translator`] into a [`LambdaExpr`] and run by
//! the call-by-value [`LambdaEvaluator`]. Primitives delegate to the same
//! [`apply_oriented`](crate::operator::apply_oriented) as the reduction
//! engine, so the two semantics can be compared directly; see
//! [`Semantics`](crate::Semantics).
//!
//! # Examples
//!
//! ```
//! use prime_calculus::lambda::{LambdaEvaluator, Translator};
//! use prime_calculus::operator::NextPrimeOperator;
//! use prime_calculus::Term;
//! use std::sync::Arc;
//!
//! let op = Arc::new(NextPrimeOperator);
//! let expr = Translator::new(op.clone()).translate(&Term::chain_of(&[3], 7)?)?;
//! let outcome = LambdaEvaluator::new(op).evaluate(&expr);
//! assert!(outcome.is_value);
//! assert_eq!(outcome.result.as_const().map(|p| p.get()), Some(11));
//! # Ok::<(), prime_calculus::CalculusError>(())
//! ```

mod eval;
mod expr;
mod translate;

pub use eval::{EvalOutcome, LambdaEvaluator, DEFAULT_EVAL_MAX_STEPS};
pub use expr::{FreshNames, LambdaExpr};
pub use translate::Translator;
