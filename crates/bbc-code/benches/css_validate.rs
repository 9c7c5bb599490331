use bbc_code::{bicycle_checks, CodeValidator, CssValidator, GeneratorSet, Polynomial, Validation};
use bbc_core::PolynomialTerm;
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_validate(c: &mut Criterion) {
    let generators = GeneratorSet::build(6, 6).unwrap();
    let a = Polynomial::new(vec![
        PolynomialTerm::x(3),
        PolynomialTerm::y(1),
        PolynomialTerm::y(2),
    ]);
    let b = Polynomial::new(vec![
        PolynomialTerm::y(3),
        PolynomialTerm::x(1),
        PolynomialTerm::x(2),
    ]);
    let validator = CssValidator::default();

    c.bench_function("bicycle_checks_6x6", |bench| {
        bench.iter(|| bicycle_checks(&generators, &a, &b).unwrap())
    });

    let (hx, hz) = bicycle_checks(&generators, &a, &b).unwrap();
    c.bench_function("css_validate_6x6", |bench| {
        bench.iter(|| match validator.validate(&hx, &hz).unwrap() {
            Validation::Css(code) => code.k(),
            Validation::Anticommuting { .. } => 0,
        })
    });
}

criterion_group!(benches, bench_validate);
criterion_main!(benches);
