#![deny(missing_docs)]
#![doc = "Generator matrices, polynomials and the CSS validity check for bivariate bicycle codes."]

/// CSS validation and logical operator extraction.
pub mod css;
/// Cyclic shift generator construction.
pub mod generators;
/// Canonical hashing helpers for CSS codes.
pub mod hash;
/// Polynomials over the generator set.
pub mod poly;

pub use css::{CodeValidator, CssCode, CssValidator, LogicalBasis, Validation};
pub use generators::GeneratorSet;
pub use hash::canonical_code_hash;
pub use poly::Polynomial;

use bbc_core::{BbcError, BitMatrix};

/// Check matrices of the bicycle code defined by `(A, B)`:
/// `hx = [A | B]` and `hz = [Bᵗ | Aᵗ]`, reduced mod 2.
pub fn bicycle_checks(
    generators: &GeneratorSet,
    a: &Polynomial,
    b: &Polynomial,
) -> Result<(BitMatrix, BitMatrix), BbcError> {
    let a_matrix = a.matrix(generators)?;
    let b_matrix = b.matrix(generators)?;
    let hx = a_matrix.to_bits().hstack(&b_matrix.to_bits())?;
    let hz = b_matrix
        .transpose()
        .to_bits()
        .hstack(&a_matrix.transpose().to_bits())?;
    Ok((hx, hz))
}
