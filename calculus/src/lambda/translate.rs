use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{CalculusError, Result};
use crate::operator::PrimeOperator;
use crate::term::Term;

use super::expr::{FreshNames, LambdaExpr};

/// The compositional translation τ from terms to lambda expressions.
///
/// | Term | τ |
/// |------|---|
/// | `N(p)` | `p` |
/// | `A(p)` | `λx.⊕(p, x)`, `x` fresh |
/// | `FUSE(p,q,r)` | `p+q+r` |
/// | `A(p1)…A(pk)e` | `(τ(A(p1)) … (τ(A(pk)) τ(e)))` |
/// | `[e]` | `τ(e)` |
/// | `(s ; t)` | `⟨τ(s), τ(t)⟩` |
/// | `(s => t)` | `(τ(s) ⇒ τ(t))` |
///
/// τ branches on the shape of a term only, never on its primes.
#[derive(Clone)]
pub struct Translator {
    operator: Arc<dyn PrimeOperator>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("operator", &self.operator.name())
            .finish()
    }
}

impl Translator {
    /// A translator whose primitives are tagged with `operator`.
    #[must_use]
    pub fn new(operator: Arc<dyn PrimeOperator>) -> Self {
        Self { operator }
    }

    /// The injected operator.
    #[must_use]
    pub fn operator(&self) -> &Arc<dyn PrimeOperator> {
        &self.operator
    }

    /// τ(term). Fresh variables are numbered from zero on every call.
    ///
    /// # Errors
    ///
    /// - [`CalculusError::IllFormedFusion`] for a fusion whose sum is not
    ///   prime.
    /// - [`CalculusError::UntranslatableTerm`] for a chain whose operator
    ///   is not an adjective or whose noun position is not noun-typed.
    pub fn translate(&self, term: &Term) -> Result<LambdaExpr> {
        self.tau(term, &mut FreshNames::new())
    }

    fn tau(&self, term: &Term, fresh: &mut FreshNames) -> Result<LambdaExpr> {
        Ok(match term {
            Term::Noun(p) => LambdaExpr::Const(*p),
            Term::Adj(p) => {
                let x = fresh.fresh("x", &BTreeSet::new());
                LambdaExpr::lam(
                    x.clone(),
                    LambdaExpr::prim_op(
                        self.operator.name(),
                        LambdaExpr::Const(*p),
                        LambdaExpr::Var(x),
                    ),
                )
            }
            Term::Fusion(fusion) => LambdaExpr::Const(fusion.fused()?),
            Term::Chain(chain) => {
                if !matches!(chain.noun(), Term::Noun(_) | Term::Fusion(_) | Term::Chain(_)) {
                    return Err(untranslatable(
                        chain.noun(),
                        "chain noun position is not noun-typed",
                    ));
                }
                let mut acc = self.tau(chain.noun(), fresh)?;
                for op in chain.operators().iter().rev() {
                    if !matches!(op, Term::Adj(_)) {
                        return Err(untranslatable(op, "chain operator is not an adjective"));
                    }
                    acc = LambdaExpr::app(self.tau(op, fresh)?, acc);
                }
                acc
            }
            Term::NounSentence(e) => self.tau(e, fresh)?,
            Term::Seq(l, r) => LambdaExpr::pair(self.tau(l, fresh)?, self.tau(r, fresh)?),
            Term::Impl(a, c) => LambdaExpr::implies(self.tau(a, fresh)?, self.tau(c, fresh)?),
        })
    }
}

fn untranslatable(term: &Term, reason: &'static str) -> CalculusError {
    CalculusError::UntranslatableTerm {
        term: term.signature(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::IdentityPrimeOperator;
    use crate::prime::Prime;

    fn translator() -> Translator {
        Translator::new(Arc::new(IdentityPrimeOperator))
    }

    fn c(p: u64) -> LambdaExpr {
        LambdaExpr::Const(Prime::new(p).unwrap())
    }

    #[test]
    fn atoms() {
        let t = translator();
        assert_eq!(t.translate(&Term::noun(7).unwrap()).unwrap(), c(7));
        assert_eq!(t.translate(&Term::fuse(3, 5, 11).unwrap()).unwrap(), c(19));
        assert_eq!(
            t.translate(&Term::adj(3).unwrap()).unwrap(),
            LambdaExpr::lam(
                "x0",
                LambdaExpr::prim_op("identity", c(3), LambdaExpr::var("x0"))
            )
        );
    }

    #[test]
    fn chains_fold_innermost_first() {
        let t = translator();
        let expr = t.translate(&Term::chain_of(&[2, 3], 7).unwrap()).unwrap();
        assert_eq!(expr.to_string(), "(λx1.⊕identity(2, x1) (λx0.⊕identity(3, x0) 7))");
    }

    #[test]
    fn sentences() {
        let t = translator();
        let term = Term::implies(
            Term::sentence(Term::noun(2).unwrap()),
            Term::seq(
                Term::sentence(Term::noun(3).unwrap()),
                Term::sentence(Term::noun(5).unwrap()),
            ),
        );
        assert_eq!(
            t.translate(&term).unwrap(),
            LambdaExpr::implies(c(2), LambdaExpr::pair(c(3), c(5)))
        );
    }

    #[test]
    fn failures() {
        let t = translator();
        assert!(matches!(
            t.translate(&Term::fuse(3, 5, 7).unwrap()),
            Err(CalculusError::IllFormedFusion { .. })
        ));
        let bad_op = Term::chain(vec![Term::noun(3).unwrap()], Term::noun(7).unwrap());
        assert!(matches!(
            t.translate(&bad_op),
            Err(CalculusError::UntranslatableTerm { .. })
        ));
        let bad_noun = Term::chain(vec![Term::adj(3).unwrap()], Term::adj(7).unwrap());
        assert!(matches!(
            t.translate(&bad_noun),
            Err(CalculusError::UntranslatableTerm { .. })
        ));
    }

    #[test]
    fn fresh_names_restart_per_call() {
        let t = translator();
        let a = Term::adj(5).unwrap();
        assert_eq!(t.translate(&a).unwrap(), t.translate(&a).unwrap());
    }
}
