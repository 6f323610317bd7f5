use std::collections::BTreeSet;
use std::fmt;

use crate::prime::Prime;

/// An expression of the target lambda calculus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LambdaExpr {
    /// A variable.
    Var(String),
    /// A prime constant.
    Const(Prime),
    /// `λx.body`.
    Lam(String, Box<LambdaExpr>),
    /// Application `(f a)`.
    App(Box<LambdaExpr>, Box<LambdaExpr>),
    /// `⟨l, r⟩`, the image of a sequence.
    Pair(Box<LambdaExpr>, Box<LambdaExpr>),
    /// `(a ⇒ c)`, the image of an implication.
    Impl(Box<LambdaExpr>, Box<LambdaExpr>),
    /// `⊕(l, r)` under the operator named `op`.
    PrimOp {
        /// [`PrimeOperator::name`](crate::operator::PrimeOperator::name) of
        /// the operator this node was built for.
        op: &'static str,
        /// Adjective side.
        left: Box<LambdaExpr>,
        /// Noun side.
        right: Box<LambdaExpr>,
    },
}

impl LambdaExpr {
    /// `x`.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// `λx.body`.
    #[must_use]
    pub fn lam(param: impl Into<String>, body: LambdaExpr) -> Self {
        Self::Lam(param.into(), Box::new(body))
    }

    /// `(f a)`.
    #[must_use]
    pub fn app(function: LambdaExpr, argument: LambdaExpr) -> Self {
        Self::App(Box::new(function), Box::new(argument))
    }

    /// `⟨l, r⟩`.
    #[must_use]
    pub fn pair(left: LambdaExpr, right: LambdaExpr) -> Self {
        Self::Pair(Box::new(left), Box::new(right))
    }

    /// `(a ⇒ c)`.
    #[must_use]
    pub fn implies(antecedent: LambdaExpr, consequent: LambdaExpr) -> Self {
        Self::Impl(Box::new(antecedent), Box::new(consequent))
    }

    /// `⊕(l, r)` tagged with an operator name.
    #[must_use]
    pub fn prim_op(op: &'static str, left: LambdaExpr, right: LambdaExpr) -> Self {
        Self::PrimOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The prime of a constant.
    #[must_use]
    pub fn as_const(&self) -> Option<Prime> {
        match self {
            Self::Const(p) => Some(*p),
            _ => None,
        }
    }

    /// Values: constants, abstractions, and pairs or implications of values.
    #[must_use]
    pub fn is_value(&self) -> bool {
        match self {
            Self::Const(_) | Self::Lam(..) => true,
            Self::Pair(l, r) | Self::Impl(l, r) => l.is_value() && r.is_value(),
            Self::Var(_) | Self::App(..) | Self::PrimOp { .. } => false,
        }
    }

    /// Variables occurring free.
    #[must_use]
    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_free(&mut Vec::new(), &mut out);
        out
    }

    fn collect_free<'a>(&'a self, bound: &mut Vec<&'a str>, out: &mut BTreeSet<String>) {
        match self {
            Self::Var(x) => {
                if !bound.contains(&x.as_str()) {
                    out.insert(x.clone());
                }
            }
            Self::Const(_) => {}
            Self::Lam(x, body) => {
                bound.push(x.as_str());
                body.collect_free(bound, out);
                bound.pop();
            }
            Self::App(l, r)
            | Self::Pair(l, r)
            | Self::Impl(l, r)
            | Self::PrimOp {
                left: l, right: r, ..
            } => {
                l.collect_free(bound, out);
                r.collect_free(bound, out);
            }
        }
    }

    /// `self[var := value]`, renaming binders that would capture a free
    /// variable of `value`.
    #[must_use]
    pub fn substitute(&self, var: &str, value: &LambdaExpr, fresh: &mut FreshNames) -> Self {
        match self {
            Self::Var(x) if x == var => value.clone(),
            Self::Var(_) | Self::Const(_) => self.clone(),
            Self::Lam(x, _) if x == var => self.clone(),
            Self::Lam(x, body) => {
                let value_free = value.free_vars();
                if value_free.contains(x) {
                    let mut avoid = value_free;
                    avoid.extend(body.free_vars());
                    avoid.insert(var.to_owned());
                    let renamed = fresh.fresh(x, &avoid);
                    let body = body.substitute(x, &Self::Var(renamed.clone()), fresh);
                    Self::lam(renamed, body.substitute(var, value, fresh))
                } else {
                    Self::lam(x.clone(), body.substitute(var, value, fresh))
                }
            }
            Self::App(l, r) => Self::app(
                l.substitute(var, value, fresh),
                r.substitute(var, value, fresh),
            ),
            Self::Pair(l, r) => Self::pair(
                l.substitute(var, value, fresh),
                r.substitute(var, value, fresh),
            ),
            Self::Impl(l, r) => Self::implies(
                l.substitute(var, value, fresh),
                r.substitute(var, value, fresh),
            ),
            Self::PrimOp { op, left, right } => Self::prim_op(
                *op,
                left.substitute(var, value, fresh),
                right.substitute(var, value, fresh),
            ),
        }
    }

    /// Equality up to renaming of bound variables.
    #[must_use]
    pub fn alpha_eq(&self, other: &LambdaExpr) -> bool {
        alpha_eq_in(self, other, &mut Vec::new())
    }
}

/// Binder pairs are searched innermost first; a variable bound on one side
/// must be bound by the matching binder on the other.
fn alpha_eq_in<'a>(
    left: &'a LambdaExpr,
    right: &'a LambdaExpr,
    binders: &mut Vec<(&'a str, &'a str)>,
) -> bool {
    use LambdaExpr as E;
    match (left, right) {
        (E::Var(x), E::Var(y)) => {
            let (x, y) = (x.as_str(), y.as_str());
            match binders.iter().rev().find(|&&(l, r)| l == x || r == y) {
                Some(&(l, r)) => l == x && r == y,
                None => x == y,
            }
        }
        (E::Const(p), E::Const(q)) => p == q,
        (E::Lam(x, b1), E::Lam(y, b2)) => {
            binders.push((x.as_str(), y.as_str()));
            let eq = alpha_eq_in(b1, b2, binders);
            binders.pop();
            eq
        }
        (E::App(f1, a1), E::App(f2, a2))
        | (E::Pair(f1, a1), E::Pair(f2, a2))
        | (E::Impl(f1, a1), E::Impl(f2, a2)) => {
            alpha_eq_in(f1, f2, binders) && alpha_eq_in(a1, a2, binders)
        }
        (
            E::PrimOp {
                op: o1,
                left: l1,
                right: r1,
            },
            E::PrimOp {
                op: o2,
                left: l2,
                right: r2,
            },
        ) => o1 == o2 && alpha_eq_in(l1, l2, binders) && alpha_eq_in(r1, r2, binders),
        _ => false,
    }
}

impl fmt::Display for LambdaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(x) => f.write_str(x),
            Self::Const(p) => write!(f, "{p}"),
            Self::Lam(x, body) => write!(f, "λ{x}.{body}"),
            Self::App(l, r) => write!(f, "({l} {r})"),
            Self::Pair(l, r) => write!(f, "⟨{l}, {r}⟩"),
            Self::Impl(l, r) => write!(f, "({l} ⇒ {r})"),
            Self::PrimOp { op, left, right } => write!(f, "⊕{op}({left}, {right})"),
        }
    }
}

/// Deterministic source of variable names.
///
/// Names are `base` followed by a counter that only grows, skipping any
/// name in the caller's avoid set.
#[derive(Debug, Clone, Default)]
pub struct FreshNames {
    next: u64,
}

impl FreshNames {
    /// A generator starting at 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A name derived from `hint` that is not in `avoid`.
    pub fn fresh(&mut self, hint: &str, avoid: &BTreeSet<String>) -> String {
        let base = hint.trim_end_matches(|c: char| c.is_ascii_digit());
        let base = if base.is_empty() { "v" } else { base };
        loop {
            let candidate = format!("{base}{}", self.next);
            self.next += 1;
            if !avoid.contains(&candidate) {
                return candidate;
            }
        }
    }
}
