//! Benchmarks for normalization, denotation, and canonical triad search.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use prime_calculus::operator::Modulus;
use prime_calculus::prime::first_n_primes;
use prime_calculus::{FusionCanonicalizer, OperatorKind, ReductionSystem, Semantics, Term};

/// `A(p1)…A(pk)N(p(k+1))` over the first primes.
fn chain(len: usize) -> Term {
    let primes = first_n_primes(len + 1);
    Term::chain_of(&primes[..len], primes[len]).unwrap()
}

// ============================================================================
// Benchmark: chain normalization per operator
// ============================================================================

fn bench_normalize(c: &mut Criterion) {
    let modulus = Modulus::DEFAULT;
    let mut group = c.benchmark_group("normalize_chain");
    // Resonance grows quickly; ten operators keep every kind inside u64.
    for len in [2usize, 6, 10] {
        let term = chain(len);
        group.throughput(Throughput::Elements(len as u64));
        for kind in OperatorKind::ALL {
            let engine = ReductionSystem::new(kind.build(modulus));
            group.bench_with_input(BenchmarkId::new(kind.name(), len), &term, |b, term| {
                b.iter(|| black_box(engine.evaluate(black_box(term)).unwrap()));
            });
        }
    }
    group.finish();
}

// ============================================================================
// Benchmark: operational vs denotational
// ============================================================================

fn bench_semantics(c: &mut Criterion) {
    let semantics = Semantics::new(Arc::new(prime_calculus::operator::NextPrimeOperator));
    let term = Term::seq(Term::sentence(chain(32)), Term::sentence(chain(32)));
    let mut group = c.benchmark_group("semantics");
    group.bench_function("denote", |b| {
        b.iter(|| black_box(semantics.denote(black_box(&term)).unwrap()));
    });
    group.bench_function("verify", |b| {
        b.iter(|| black_box(semantics.verify_semantic_equivalence(black_box(&term)).unwrap()));
    });
    group.finish();
}

// ============================================================================
// Benchmark: canonical triads (cold cache)
// ============================================================================

fn bench_canonical(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical_triad");
    for target in [101u64, 1009, 10007] {
        group.bench_with_input(BenchmarkId::from_parameter(target), &target, |b, &t| {
            b.iter(|| black_box(FusionCanonicalizer::new().canonical(t).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_semantics, bench_canonical);
criterion_main!(benches);
