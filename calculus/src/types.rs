//! Type system: noun, adjective, and sentence types, a typing context, and
//! the checker producing judgments `Γ ⊢ e : T`.
//!
//! | Term | Rule | Type |
//! |------|------|------|
//! | `N(p)` | ground | `N[p]` |
//! | `A(p)` | ground | `A[p]` |
//! | `FUSE(p,q,r)` | well-formed | `N[p+q+r]` |
//! | `A…A e` | every operator `A[_]`, `e : N` | `N` |
//! | `[e]` | `e : N` | `S` |
//! | `(s ; t)` | `s, t : S` | `(S × S)` |
//! | `(s => t)` | `s, t : S` | `(S → S)` |
//!
//! # Examples
//!
//! ```
//! use prime_calculus::{Term, TypeChecker, TypingContext, Type};
//!
//! let checker = TypeChecker::new();
//! let term = Term::chain_of(&[2, 3], 7)?;
//! let judgment = checker.check(&term, &TypingContext::new())?;
//! assert_eq!(judgment.ty(), &Type::Noun(None));
//!
//! let bad = Term::chain(vec![Term::noun(3)?], Term::noun(7)?);
//! assert!(checker.check(&bad, &TypingContext::new()).is_err());
//! # Ok::<(), prime_calculus::CalculusError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CalculusError, Result};
use crate::prime::Prime;
use crate::term::Term;

/// Coarse classification of a type, used in rule-level error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Some noun type.
    Noun,
    /// Some adjective type.
    Adj,
    /// Some sentence type.
    Sentence,
}

impl TypeKind {
    /// The kind a term's shape claims, without checking its subterms.
    #[must_use]
    pub fn of_shape(term: &Term) -> Self {
        match term {
            Term::Adj(_) => Self::Adj,
            _ if term.is_sentence() => Self::Sentence,
            _ => Self::Noun,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Noun => "noun",
            Self::Adj => "adjective",
            Self::Sentence => "sentence",
        })
    }
}

/// A type of the calculus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Type {
    /// Noun type. Literal nouns and fusions are indexed by their prime;
    /// chains produce a noun whose prime depends on the operator, so their
    /// type carries no index.
    Noun(Option<Prime>),
    /// Adjective type indexed by the operator's prime.
    Adj(Prime),
    /// Sentence type.
    Sentence(SentenceType),
}

/// Structure of a sentence type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SentenceType {
    /// A noun sentence.
    Atomic,
    /// Sequential composition, product-like.
    Product(Box<SentenceType>, Box<SentenceType>),
    /// Implication, function-like.
    Function(Box<SentenceType>, Box<SentenceType>),
}

impl Type {
    /// The coarse kind of this type.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Noun(_) => TypeKind::Noun,
            Self::Adj(_) => TypeKind::Adj,
            Self::Sentence(_) => TypeKind::Sentence,
        }
    }

    /// Whether a term of type `other` satisfies an annotation of this type.
    ///
    /// An unindexed noun annotation admits every noun; all other
    /// annotations require equality.
    #[must_use]
    pub fn admits(&self, other: &Type) -> bool {
        match (self, other) {
            (Self::Noun(None), Self::Noun(_)) => true,
            _ => self == other,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Noun(Some(p)) => write!(f, "N[{p}]"),
            Self::Noun(None) => f.write_str("N"),
            Self::Adj(p) => write!(f, "A[{p}]"),
            Self::Sentence(s) => write!(f, "{s}"),
        }
    }
}

impl fmt::Display for SentenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atomic => f.write_str("S"),
            Self::Product(l, r) => write!(f, "({l} × {r})"),
            Self::Function(a, c) => write!(f, "({a} → {c})"),
        }
    }
}

/// Γ: type annotations keyed by term signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingContext {
    bindings: BTreeMap<String, Type>,
}

impl TypingContext {
    /// The empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotates `term` with `ty`, replacing any earlier annotation.
    pub fn bind(&mut self, term: &Term, ty: Type) {
        self.bindings.insert(term.signature(), ty);
    }

    /// Builder form of [`TypingContext::bind`].
    #[must_use]
    pub fn with(mut self, term: &Term, ty: Type) -> Self {
        self.bind(term, ty);
        self
    }

    /// The annotation for `term`, if any.
    #[must_use]
    pub fn lookup(&self, term: &Term) -> Option<&Type> {
        self.bindings.get(&term.signature())
    }

    /// Number of annotations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if there are no annotations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Display for TypingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bindings.is_empty() {
            return f.write_str("∅");
        }
        for (i, (sig, ty)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{sig} : {ty}")?;
        }
        Ok(())
    }
}

/// A derived judgment `Γ ⊢ e : T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingJudgment {
    context: TypingContext,
    term: Term,
    ty: Type,
}

impl TypingJudgment {
    /// Γ.
    #[must_use]
    pub fn context(&self) -> &TypingContext {
        &self.context
    }

    /// e.
    #[must_use]
    pub fn term(&self) -> &Term {
        &self.term
    }

    /// T.
    #[must_use]
    pub fn ty(&self) -> &Type {
        &self.ty
    }
}

impl fmt::Display for TypingJudgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ⊢ {} : {}", self.context, self.term, self.ty)
    }
}

/// Syntax-directed type checker.
///
/// Zero-sized; every rule is a pure function of the term and the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeChecker;

impl TypeChecker {
    /// Creates a checker.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Derives `Γ ⊢ term : T`.
    ///
    /// # Errors
    ///
    /// - [`CalculusError::TypeMismatch`] when a rule's premise does not
    ///   hold or an annotation in `context` disagrees with the inferred type.
    /// - [`CalculusError::IllFormedFusion`] for a fusion whose sum is not
    ///   prime.
    pub fn check(&self, term: &Term, context: &TypingContext) -> Result<TypingJudgment> {
        let ty = self.infer(term, context)?;
        Ok(TypingJudgment {
            context: context.clone(),
            term: term.clone(),
            ty,
        })
    }

    /// Infers the type of `term` under `context`.
    ///
    /// # Errors
    ///
    /// As [`TypeChecker::check`].
    pub fn infer(&self, term: &Term, context: &TypingContext) -> Result<Type> {
        let ty = match term {
            Term::Noun(p) => Type::Noun(Some(*p)),
            Term::Adj(p) => Type::Adj(*p),
            Term::Fusion(f) => Type::Noun(Some(f.fused()?)),
            Term::Chain(chain) => {
                for op in chain.operators() {
                    self.expect(op, TypeKind::Adj, context)?;
                }
                self.expect(chain.noun(), TypeKind::Noun, context)?;
                Type::Noun(None)
            }
            Term::NounSentence(e) => {
                self.expect(e, TypeKind::Noun, context)?;
                Type::Sentence(SentenceType::Atomic)
            }
            Term::Seq(l, r) => {
                let l = self.expect_sentence(l, context)?;
                let r = self.expect_sentence(r, context)?;
                Type::Sentence(SentenceType::Product(Box::new(l), Box::new(r)))
            }
            Term::Impl(a, c) => {
                let a = self.expect_sentence(a, context)?;
                let c = self.expect_sentence(c, context)?;
                Type::Sentence(SentenceType::Function(Box::new(a), Box::new(c)))
            }
        };
        match context.lookup(term) {
            Some(annotated) if !annotated.admits(&ty) => Err(CalculusError::TypeMismatch {
                expected: annotated.to_string(),
                actual: ty.to_string(),
                term: term.signature(),
            }),
            _ => Ok(ty),
        }
    }

    fn expect(&self, term: &Term, kind: TypeKind, context: &TypingContext) -> Result<Type> {
        let ty = self.infer(term, context)?;
        if ty.kind() == kind {
            Ok(ty)
        } else {
            Err(CalculusError::TypeMismatch {
                expected: kind.to_string(),
                actual: ty.kind().to_string(),
                term: term.signature(),
            })
        }
    }

    fn expect_sentence(&self, term: &Term, context: &TypingContext) -> Result<SentenceType> {
        match self.expect(term, TypeKind::Sentence, context)? {
            Type::Sentence(s) => Ok(s),
            // `expect` has already checked the kind.
            other => Err(CalculusError::TypeMismatch {
                expected: TypeKind::Sentence.to_string(),
                actual: other.kind().to_string(),
                term: term.signature(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(p: u64) -> Term {
        Term::noun(p).unwrap()
    }

    fn a(p: u64) -> Term {
        Term::adj(p).unwrap()
    }

    fn prime(p: u64) -> Prime {
        Prime::new(p).unwrap()
    }

    #[test]
    fn ground_types() {
        let ctx = TypingContext::new();
        let checker = TypeChecker::new();
        assert_eq!(checker.infer(&n(7), &ctx).unwrap(), Type::Noun(Some(prime(7))));
        assert_eq!(checker.infer(&a(3), &ctx).unwrap(), Type::Adj(prime(3)));
        assert_eq!(
            checker.infer(&Term::fuse(3, 5, 11).unwrap(), &ctx).unwrap(),
            Type::Noun(Some(prime(19)))
        );
    }

    #[test]
    fn ill_formed_fusion_is_rejected() {
        let err = TypeChecker::new()
            .infer(&Term::fuse(3, 5, 7).unwrap(), &TypingContext::new())
            .unwrap_err();
        assert!(matches!(err, CalculusError::IllFormedFusion { sum: 15, .. }));
    }

    #[test]
    fn chain_requires_adjective_operators() {
        let bad = Term::chain(vec![a(2), n(3)], n(7));
        let err = TypeChecker::new()
            .check(&bad, &TypingContext::new())
            .unwrap_err();
        assert_eq!(
            err,
            CalculusError::TypeMismatch {
                expected: "adjective".into(),
                actual: "noun".into(),
                term: "N(3)".into(),
            }
        );
    }

    #[test]
    fn chain_requires_noun_position() {
        let bad = Term::chain(vec![a(2)], a(3));
        assert!(matches!(
            TypeChecker::new().check(&bad, &TypingContext::new()),
            Err(CalculusError::TypeMismatch { .. })
        ));
        let over_fusion = Term::chain(vec![a(2)], Term::fuse(3, 5, 11).unwrap());
        assert!(TypeChecker::new()
            .check(&over_fusion, &TypingContext::new())
            .is_ok());
    }

    #[test]
    fn sentence_types() {
        let checker = TypeChecker::new();
        let ctx = TypingContext::new();
        let s = Term::implies(
            Term::seq(Term::sentence(n(2)), Term::sentence(n(3))),
            Term::sentence(Term::chain_of(&[5], 7).unwrap()),
        );
        let judgment = checker.check(&s, &ctx).unwrap();
        assert_eq!(judgment.ty().to_string(), "((S × S) → S)");

        // Sequencing raw nouns is not a sentence.
        let bad = Term::seq(n(2), Term::sentence(n(3)));
        assert!(matches!(
            checker.check(&bad, &ctx),
            Err(CalculusError::TypeMismatch { .. })
        ));
        // A sentence may not wrap an adjective.
        assert!(checker.check(&Term::sentence(a(2)), &ctx).is_err());
    }

    #[test]
    fn annotations_are_enforced() {
        let checker = TypeChecker::new();
        let term = Term::chain_of(&[3], 7).unwrap();
        let ctx = TypingContext::new().with(&term, Type::Noun(None));
        assert!(checker.check(&term, &ctx).is_ok());

        let ctx = TypingContext::new().with(&n(7), Type::Noun(Some(prime(11))));
        let err = checker.check(&term, &ctx).unwrap_err();
        assert_eq!(
            err,
            CalculusError::TypeMismatch {
                expected: "N[11]".into(),
                actual: "N[7]".into(),
                term: "N(7)".into(),
            }
        );
    }

    #[test]
    fn judgment_display() {
        let ctx = TypingContext::new();
        let j = TypeChecker::new().check(&n(5), &ctx).unwrap();
        assert_eq!(j.to_string(), "∅ ⊢ N(5) : N[5]");
    }
}
