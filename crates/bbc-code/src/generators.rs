use bbc_core::{BbcError, ErrorInfo, Family, IntMatrix, PolynomialTerm};

/// Cyclic shift generators `x_i = S_l^i ⊗ I_m` and `y_j = I_l ⊗ S_m^j` for a
/// fixed `(l, m)`. Built once per pair and shared read-only by every
/// candidate of that pair.
#[derive(Debug, Clone)]
pub struct GeneratorSet {
    l: usize,
    m: usize,
    x: Vec<IntMatrix>,
    y: Vec<IntMatrix>,
}

impl GeneratorSet {
    /// Builds both generator families for the product group of order `l * m`.
    pub fn build(l: usize, m: usize) -> Result<Self, BbcError> {
        if l == 0 || m == 0 {
            let info = ErrorInfo::new("non-positive-order", "cyclic group orders must be positive")
                .with_context("l", l.to_string())
                .with_context("m", m.to_string());
            return Err(BbcError::Group(info));
        }
        // every generator is a dense (l*m) x (l*m) matrix, as are the
        // per-factor shifts of side l and m it is assembled from
        let entries = l
            .checked_mul(m)
            .and_then(|order| order.checked_mul(order))
            .filter(|_| l.checked_mul(l).is_some() && m.checked_mul(m).is_some());
        if entries.is_none() {
            let info = ErrorInfo::new("order-overflow", "generator size (l*m)^2 overflows")
                .with_context("l", l.to_string())
                .with_context("m", m.to_string());
            return Err(BbcError::Group(info));
        }

        let identity_l = IntMatrix::identity(l);
        let identity_m = IntMatrix::identity(m);
        let x = (0..l)
            .map(|i| IntMatrix::cyclic_shift(l, i).kron(&identity_m))
            .collect();
        let y = (0..m)
            .map(|j| identity_l.kron(&IntMatrix::cyclic_shift(m, j)))
            .collect();
        Ok(Self { l, m, x, y })
    }

    /// Order of the `x` group.
    pub fn l(&self) -> usize {
        self.l
    }

    /// Order of the `y` group.
    pub fn m(&self) -> usize {
        self.m
    }

    /// Order of the product group, the side length of every generator.
    pub fn order(&self) -> usize {
        self.l * self.m
    }

    /// All `x_i` generators indexed by exponent.
    pub fn x_generators(&self) -> &[IntMatrix] {
        &self.x
    }

    /// All `y_j` generators indexed by exponent.
    pub fn y_generators(&self) -> &[IntMatrix] {
        &self.y
    }

    /// Resolves a term to its generator matrix.
    pub fn matrix(&self, term: PolynomialTerm) -> Result<&IntMatrix, BbcError> {
        let (family, order) = match term.family {
            Family::X => (&self.x, self.l),
            Family::Y => (&self.y, self.m),
        };
        family.get(term.exponent).ok_or_else(|| {
            let info = ErrorInfo::new(
                "exponent-out-of-range",
                "term exponent exceeds the order of its cyclic group",
            )
            .with_context("term", term.to_string())
            .with_context("order", order.to_string());
            BbcError::Group(info)
        })
    }
}
