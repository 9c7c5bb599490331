use std::fmt;

use bbc_core::{BbcError, IntMatrix, PolynomialTerm};
use serde::{Deserialize, Serialize};

use crate::generators::GeneratorSet;

/// Ordered multiset of generator terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Polynomial {
    terms: Vec<PolynomialTerm>,
}

impl Polynomial {
    /// Creates a polynomial from its terms, keeping their order.
    pub fn new(terms: Vec<PolynomialTerm>) -> Self {
        Self { terms }
    }

    /// Number of terms.
    pub fn weight(&self) -> usize {
        self.terms.len()
    }

    /// Terms in insertion order.
    pub fn terms(&self) -> &[PolynomialTerm] {
        &self.terms
    }

    /// Exponents in insertion order.
    pub fn exponents(&self) -> Vec<usize> {
        self.terms.iter().map(|term| term.exponent).collect()
    }

    /// Integer sum of the selected generator matrices. Entries are not
    /// reduced, so a repeated term contributes 2.
    pub fn matrix(&self, generators: &GeneratorSet) -> Result<IntMatrix, BbcError> {
        let order = generators.order();
        let mut acc = IntMatrix::zeros(order, order);
        for term in &self.terms {
            acc.add_assign(generators.matrix(*term)?)?;
        }
        Ok(acc)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, term) in self.terms.iter().enumerate() {
            if idx > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

impl From<Vec<PolynomialTerm>> for Polynomial {
    fn from(terms: Vec<PolynomialTerm>) -> Self {
        Self::new(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_terms() {
        let poly = Polynomial::new(vec![
            PolynomialTerm::x(3),
            PolynomialTerm::y(1),
            PolynomialTerm::y(2),
        ]);
        assert_eq!(poly.to_string(), "x3 + y1 + y2");
        assert_eq!(poly.weight(), 3);
    }

    #[test]
    fn repeated_terms_accumulate() {
        let gens = GeneratorSet::build(3, 3).unwrap();
        let poly = Polynomial::new(vec![PolynomialTerm::x(1), PolynomialTerm::x(1)]);
        let matrix = poly.matrix(&gens).unwrap();
        assert_eq!(matrix.get(0, 3), 2);
        assert!(matrix.to_bits().is_zero());
    }
}
