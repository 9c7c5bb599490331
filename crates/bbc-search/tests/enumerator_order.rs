use bbc_core::Family;
use bbc_search::PolynomialEnumerator;

#[test]
fn enumeration_is_idempotent() {
    let enumerator = PolynomialEnumerator::new(4, 1..3, 0..2).unwrap();
    let first: Vec<_> = enumerator.iter().collect();
    let second: Vec<_> = enumerator.iter().collect();
    assert_eq!(first, second);

    let rebuilt = PolynomialEnumerator::new(4, 1..3, 0..2).unwrap();
    let third: Vec<_> = rebuilt.iter().collect();
    assert_eq!(first, third);
}

#[test]
fn ordinals_are_dense_and_decodable() {
    let enumerator = PolynomialEnumerator::new(3, 0..3, 0..2).unwrap();
    for (idx, assignment) in enumerator.iter().enumerate() {
        assert_eq!(assignment.ordinal, idx);
        assert_eq!(enumerator.get(idx).as_ref(), Some(&assignment));
    }
    assert_eq!(enumerator.iter().len(), enumerator.len());
}

#[test]
fn every_combination_appears_once() {
    let enumerator = PolynomialEnumerator::new(3, 0..2, 0..2).unwrap();
    let mut seen = std::collections::BTreeSet::new();
    for assignment in enumerator.iter() {
        let key = (
            assignment.a.terms().to_vec(),
            assignment.b.terms().to_vec(),
        );
        assert!(seen.insert(key));
    }
    assert_eq!(seen.len(), enumerator.len());
}

#[test]
fn family_axis_varies_slower_than_exponents() {
    let enumerator = PolynomialEnumerator::new(2, 0..2, 0..2).unwrap();
    let items: Vec<_> = enumerator.iter().collect();
    // exponents of B, then A, then families of B, then A
    let rendered: Vec<String> = items
        .iter()
        .map(|item| format!("{} | {}", item.a, item.b))
        .collect();
    assert_eq!(&rendered[..5], &["x0 | x0", "x0 | x1", "x1 | x0", "x1 | x1", "x0 | y0"]);
    assert!(items.iter().take(4).all(|item| item.a.terms()[0].family == Family::X));
}
