use std::ops::Range;

use bbc_code::Polynomial;
use bbc_core::{BbcError, ErrorInfo, Family, PolynomialTerm};

/// One point of the enumeration: a weight split with families and exponents
/// chosen for every term of A and B.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Position in the enumeration order.
    pub ordinal: usize,
    /// Number of terms in A.
    pub weight_a: usize,
    /// Number of terms in B.
    pub weight_b: usize,
    /// Polynomial A.
    pub a: Polynomial,
    /// Polynomial B.
    pub b: Polynomial,
}

impl Assignment {
    /// Total number of terms.
    pub fn weight(&self) -> usize {
        self.weight_a + self.weight_b
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    weight_a: usize,
    start: usize,
    size: usize,
}

/// Streams every `(weight_a, families_a, families_b, exponents_a,
/// exponents_b)` choice for a fixed total weight.
///
/// The order is lexicographic with the last axis fastest: `weight_a` from 1
/// to `W - 1`, then the family choices of A, of B (`x` before `y`), then the
/// exponents of A and of B in range order. Every position can be decoded
/// independently with [`PolynomialEnumerator::get`], so the index space can
/// be split between workers without materialising the product.
#[derive(Debug, Clone)]
pub struct PolynomialEnumerator {
    weight: usize,
    exponents_a: Range<usize>,
    exponents_b: Range<usize>,
    segments: Vec<Segment>,
    len: usize,
}

fn too_large(weight: usize) -> BbcError {
    let info = ErrorInfo::new(
        "enumeration-too-large",
        "number of weight/power assignments overflows usize",
    )
    .with_context("weight", weight.to_string())
    .with_hint("narrow the exponent ranges or the weight");
    BbcError::Config(info)
}

impl PolynomialEnumerator {
    /// Creates the enumerator, failing on `weight < 2`, an empty exponent
    /// range or a product too large to index.
    pub fn new(
        weight: usize,
        exponents_a: Range<usize>,
        exponents_b: Range<usize>,
    ) -> Result<Self, BbcError> {
        if weight < 2 {
            let info = ErrorInfo::new(
                "weight-too-small",
                "total weight must leave at least one term for A and for B",
            )
            .with_context("weight", weight.to_string());
            return Err(BbcError::Config(info));
        }
        for (name, range) in [("exponents_a", &exponents_a), ("exponents_b", &exponents_b)] {
            if range.is_empty() {
                let info = ErrorInfo::new("empty-range", "exponent range is empty")
                    .with_context("field", name)
                    .with_context("range", format!("{}..{}", range.start, range.end));
                return Err(BbcError::Config(info));
            }
        }

        let radix_a = exponents_a.len();
        let radix_b = exponents_b.len();
        let families = 2usize
            .checked_pow(weight as u32)
            .ok_or_else(|| too_large(weight))?;
        let mut segments = Vec::with_capacity(weight - 1);
        let mut start = 0usize;
        for weight_a in 1..weight {
            let weight_b = weight - weight_a;
            let size = radix_a
                .checked_pow(weight_a as u32)
                .and_then(|pa| {
                    radix_b
                        .checked_pow(weight_b as u32)
                        .and_then(|pb| pa.checked_mul(pb))
                })
                .and_then(|powers| powers.checked_mul(families))
                .ok_or_else(|| too_large(weight))?;
            segments.push(Segment {
                weight_a,
                start,
                size,
            });
            start = start.checked_add(size).ok_or_else(|| too_large(weight))?;
        }

        Ok(Self {
            weight,
            exponents_a,
            exponents_b,
            segments,
            len: start,
        })
    }

    /// Total weight `W`.
    pub fn weight(&self) -> usize {
        self.weight
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when there is nothing to enumerate.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Decodes the assignment at `ordinal`.
    pub fn get(&self, ordinal: usize) -> Option<Assignment> {
        let segment = self
            .segments
            .iter()
            .find(|segment| ordinal >= segment.start && ordinal < segment.start + segment.size)?;
        let weight_a = segment.weight_a;
        let weight_b = self.weight - weight_a;
        let mut rest = ordinal - segment.start;

        let powers_b = decode_digits(&mut rest, weight_b, self.exponents_b.len());
        let powers_a = decode_digits(&mut rest, weight_a, self.exponents_a.len());
        let families_b = decode_digits(&mut rest, weight_b, Family::ALL.len());
        let families_a = decode_digits(&mut rest, weight_a, Family::ALL.len());

        let a = build_polynomial(&families_a, &powers_a, self.exponents_a.start);
        let b = build_polynomial(&families_b, &powers_b, self.exponents_b.start);
        Some(Assignment {
            ordinal,
            weight_a,
            weight_b,
            a,
            b,
        })
    }

    /// Lazy iterator over every assignment in reference order. Each call
    /// restarts from the beginning.
    pub fn iter(&self) -> Assignments<'_> {
        Assignments {
            enumerator: self,
            next: 0,
        }
    }
}

/// Pops `count` digits of base `radix` from the low end of `rest`; the last
/// digit is the fastest varying one.
fn decode_digits(rest: &mut usize, count: usize, radix: usize) -> Vec<usize> {
    let mut digits = vec![0; count];
    for slot in digits.iter_mut().rev() {
        *slot = *rest % radix;
        *rest /= radix;
    }
    digits
}

fn build_polynomial(families: &[usize], powers: &[usize], offset: usize) -> Polynomial {
    families
        .iter()
        .zip(powers)
        .map(|(&family, &power)| PolynomialTerm::new(Family::ALL[family], offset + power))
        .collect::<Vec<_>>()
        .into()
}

/// Iterator returned by [`PolynomialEnumerator::iter`].
#[derive(Debug, Clone)]
pub struct Assignments<'a> {
    enumerator: &'a PolynomialEnumerator,
    next: usize,
}

impl Iterator for Assignments<'_> {
    type Item = Assignment;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.enumerator.get(self.next)?;
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.enumerator.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Assignments<'_> {}
