use bbc_code::{CssValidator, GeneratorSet};
use bbc_search::{CandidateOutcome, CodeSynthesizer, PolynomialEnumerator, RateFilter};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_enumerate(c: &mut Criterion) {
    let enumerator = PolynomialEnumerator::new(6, 1..4, 1..4).unwrap();
    c.bench_function("enumerate_first_4096", |b| {
        b.iter(|| enumerator.iter().take(4096).count())
    });

    let generators = GeneratorSet::build(6, 6).unwrap();
    let validator = CssValidator::default();
    let synth = CodeSynthesizer::new(&generators, &validator, RateFilter::default());
    let batch: Vec<_> = enumerator.iter().step_by(997).take(64).collect();
    c.bench_function("synthesize_64_candidates", |b| {
        b.iter(|| {
            batch
                .iter()
                .filter(|assignment| {
                    matches!(synth.synthesize(assignment), CandidateOutcome::Accepted(_))
                })
                .count()
        })
    });
}

criterion_group!(benches, bench_enumerate);
criterion_main!(benches);
