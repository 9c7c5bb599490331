use bbc_code::{bicycle_checks, CssCode, GeneratorSet, Polynomial};
use bbc_core::PolynomialTerm;
use bbc_dist::{code_distance, formulate, SolveOptions};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_distance(c: &mut Criterion) {
    let generators = GeneratorSet::build(3, 3).unwrap();
    let a = Polynomial::new(vec![PolynomialTerm::x(0), PolynomialTerm::x(1)]);
    let b = Polynomial::new(vec![PolynomialTerm::y(0), PolynomialTerm::y(1)]);
    let (hx, hz) = bicycle_checks(&generators, &a, &b).unwrap();
    let code = CssCode::new(hx, hz).unwrap();
    let logicals = code.logical_operators().unwrap();
    let options = SolveOptions::default();

    c.bench_function("formulate_toric_3x3", |bench| {
        bench.iter(|| formulate(code.hx(), &logicals.lx.row_dense(0)).unwrap())
    });
    c.bench_function("distance_toric_3x3", |bench| {
        bench.iter(|| code_distance(code.hx(), &logicals.lx, &options))
    });
}

criterion_group!(benches, bench_distance);
criterion_main!(benches);
