//! End-to-end scenarios through the public API.

use std::sync::Arc;

use prime_calculus::operator::{
    IdentityPrimeOperator, NextPrimeOperator, Orientation, PrimeOperator, ResonancePrimeOperator,
};
use prime_calculus::reduction::StepDetails;
use prime_calculus::reduction::verify::{confluence_of, test_local_confluence};
use prime_calculus::{
    parse_term, CalculusError, EngineConfig, OperatorKind, Prime, ReductionSystem, Rule, Semantics,
    Strategy, Term, Type, TypeChecker, TypingContext,
};

/// `max(p, q)` on the canonical domain.
#[derive(Debug)]
struct MaxOperator;

impl PrimeOperator for MaxOperator {
    fn name(&self) -> &'static str {
        "max"
    }

    fn apply(&self, p: u64, q: u64) -> prime_calculus::Result<Prime> {
        if !self.can_apply(p, q) {
            return Err(CalculusError::OperatorDomain {
                operator: self.name(),
                p,
                q,
            });
        }
        Prime::new(q)
    }
}

#[test]
fn fusion_reduces_to_its_sum() {
    let engine = ReductionSystem::new(Arc::new(ResonancePrimeOperator));
    let trace = engine.normalize(&parse_term("FUSE(3,5,11)").unwrap()).unwrap();
    assert_eq!(trace.rules().collect::<Vec<_>>(), vec![Rule::Fuse]);
    assert_eq!(trace.final_term(), &Term::noun(19).unwrap());
}

#[test]
fn identity_chain_keeps_its_noun() {
    let engine = ReductionSystem::new(Arc::new(IdentityPrimeOperator));
    let term = Term::chain(
        vec![Term::adj(2).unwrap(), Term::adj(3).unwrap()],
        Term::noun(7).unwrap(),
    );
    assert_eq!(engine.evaluate(&term).unwrap(), Term::noun(7).unwrap());
}

#[test]
fn checker_rejects_nouns_in_operator_position() {
    let term = parse_term("N(3)N(7)").unwrap();
    let err = TypeChecker::new()
        .check(&term, &TypingContext::new())
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
fn sentence_types_compose() {
    let term = parse_term("([N(2)] => ([A(3)N(5)] ; [FUSE(3,5,11)]))").unwrap();
    let judgment = TypeChecker::new()
        .check(&term, &TypingContext::new())
        .unwrap();
    assert!(matches!(judgment.ty(), Type::Sentence(_)));
    assert_eq!(judgment.to_string(), format!("∅ ⊢ {term} : {}", judgment.ty()));
}

#[test]
fn long_chains_hit_the_step_limit() {
    let engine = ReductionSystem::new(Arc::new(NextPrimeOperator)).with_max_steps(10);
    let term = Term::chain_of(&[2; 50], 3).unwrap();
    assert!(matches!(
        engine.normalize(&term),
        Err(CalculusError::NonTermination { max_steps: 10, .. })
    ));
}

#[test]
fn independent_sentences_are_confluent() {
    let engine = ReductionSystem::new(Arc::new(NextPrimeOperator));
    let term = parse_term("([A(2)A(3)N(7)] ; [FUSE(5,7,11)])").unwrap();
    let left = engine.evaluate(&term).unwrap();
    let right = engine
        .clone()
        .with_strategy(Strategy::RightmostFirst)
        .evaluate(&term)
        .unwrap();
    assert_eq!(left, right);
    assert_eq!(left.to_string(), "([N(13)] ; [N(23)])");
    let report = confluence_of(&engine, &term).unwrap();
    // Two APPLY steps on the left interleave with one FUSE on the right.
    assert_eq!(report.paths, 3);
    assert_eq!(report.normal_form, left);
    assert!(test_local_confluence(&engine).is_ok());
}

#[test]
fn user_operators_plug_into_both_semantics() {
    let semantics = Semantics::new(Arc::new(MaxOperator));
    // max(3, 7) = 7, then 11 and 7 swap into max(7, 11) = 11.
    let term = parse_term("A(11)A(3)N(7)").unwrap();
    let agreement = semantics.verify_semantic_equivalence(&term).unwrap();
    assert_eq!(agreement.value().map(Prime::get), Some(11));
    let orientations: Vec<_> = semantics
        .engine()
        .normalize(&term)
        .unwrap()
        .steps()
        .iter()
        .filter_map(|s| match s.details {
            StepDetails::Apply { combination, .. } => Some(combination.orientation),
            StepDetails::Fuse { .. } => None,
        })
        .collect();
    assert_eq!(orientations, vec![Orientation::Forward, Orientation::Swapped]);
}

#[test]
fn config_drives_every_component() {
    let config = EngineConfig {
        operator: OperatorKind::NextPrime,
        max_steps: 3,
        ..EngineConfig::default()
    };
    let semantics = config.semantics();
    assert_eq!(semantics.engine().max_steps(), 3);
    assert!(semantics
        .verify_semantic_equivalence(&Term::chain_of(&[2, 3], 7).unwrap())
        .is_ok());
    assert!(semantics
        .verify_semantic_equivalence(&Term::chain_of(&[2, 3, 5, 7], 7).unwrap())
        .is_err());
}
