use bbc_code::{
    bicycle_checks, CodeValidator, CssCode, CssValidator, GeneratorSet, Polynomial, Validation,
};
use bbc_core::{Family, PolynomialTerm};
use proptest::prelude::*;

fn gross_72() -> (Polynomial, Polynomial) {
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
    (a, b)
}

#[test]
fn bicycle_72_12_code_parameters() {
    let generators = GeneratorSet::build(6, 6).unwrap();
    let (a, b) = gross_72();
    let (hx, hz) = bicycle_checks(&generators, &a, &b).unwrap();
    assert_eq!((hx.rows(), hx.cols()), (36, 72));
    assert_eq!((hz.rows(), hz.cols()), (36, 72));

    let code = CssCode::new(hx, hz).unwrap();
    assert_eq!(code.n(), 72);
    assert_eq!(code.k(), 12);

    let logicals = code.logical_operators().unwrap();
    assert_eq!(logicals.lx.rows(), 12);
    assert_eq!(logicals.lz.rows(), 12);
    assert!(code.hz().mul_transpose(&logicals.lx).unwrap().is_zero());
    assert!(code.hx().mul_transpose(&logicals.lz).unwrap().is_zero());
    assert_eq!(logicals.lx.mul_transpose(&logicals.lz).unwrap().rank(), 12);
    assert_eq!(code.canonical_hash().len(), 64);
}

fn term_strategy(order: usize) -> impl Strategy<Value = PolynomialTerm> {
    (prop_oneof![Just(Family::X), Just(Family::Y)], 0..order)
        .prop_map(|(family, exponent)| PolynomialTerm::new(family, exponent))
}

proptest! {
    #[test]
    fn bicycle_checks_always_commute(
        a in proptest::collection::vec(term_strategy(3), 1..4),
        b in proptest::collection::vec(term_strategy(3), 1..4),
    ) {
        let generators = GeneratorSet::build(3, 3).unwrap();
        let (hx, hz) =
            bicycle_checks(&generators, &Polynomial::new(a), &Polynomial::new(b)).unwrap();
        prop_assert!(hx.mul_transpose(&hz).unwrap().is_zero());
        match CssValidator::default().validate(&hx, &hz).unwrap() {
            Validation::Css(code) => {
                let logicals = code.logical_operators().unwrap();
                prop_assert_eq!(logicals.lx.rows(), code.k());
            }
            Validation::Anticommuting { .. } => prop_assert!(false, "bicycle checks anticommute"),
        }
    }
}
