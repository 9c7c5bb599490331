use std::fmt;

use serde::{Deserialize, Serialize};

use crate::matrix::BitMatrix;

/// Generator family of a polynomial term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Shift generators of the order-`l` cyclic group, `x_i`.
    X,
    /// Shift generators of the order-`m` cyclic group, `y_j`.
    Y,
}

impl Family {
    /// Both families in enumeration order.
    pub const ALL: [Family; 2] = [Family::X, Family::Y];

    /// Lowercase symbol used in polynomial descriptions.
    pub fn symbol(self) -> char {
        match self {
            Family::X => 'x',
            Family::Y => 'y',
        }
    }
}

/// A `(family, exponent)` pair selecting one generator matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PolynomialTerm {
    /// Generator family.
    pub family: Family,
    /// Shift exponent within the family.
    pub exponent: usize,
}

impl PolynomialTerm {
    /// Creates a new term.
    pub const fn new(family: Family, exponent: usize) -> Self {
        Self { family, exponent }
    }

    /// Shorthand for an `x` term.
    pub const fn x(exponent: usize) -> Self {
        Self::new(Family::X, exponent)
    }

    /// Shorthand for a `y` term.
    pub const fn y(exponent: usize) -> Self {
        Self::new(Family::Y, exponent)
    }
}

impl fmt::Display for PolynomialTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.family.symbol(), self.exponent)
    }
}

/// Result of the distance pass for one stored configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceOutcome {
    /// Exact minimum weight over all logical operators.
    Exact {
        /// Code distance.
        distance: usize,
    },
    /// At least one logical operator could not be solved.
    Failed {
        /// Diagnostic describing the first failure.
        reason: String,
        /// Minimum over the operators that did solve, when any did.
        #[serde(default)]
        upper_bound: Option<usize>,
    },
}

impl DistanceOutcome {
    /// Returns the exact distance, if computed.
    pub fn exact(&self) -> Option<usize> {
        match self {
            DistanceOutcome::Exact { distance } => Some(*distance),
            DistanceOutcome::Failed { .. } => None,
        }
    }

    /// Returns true for the failure sentinel.
    pub fn is_failed(&self) -> bool {
        matches!(self, DistanceOutcome::Failed { .. })
    }
}

/// Accepted bicycle code configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeConfig {
    /// Order of the `x` cyclic group.
    pub l: usize,
    /// Order of the `y` cyclic group.
    pub m: usize,
    /// Total number of terms across both polynomials.
    pub weight: usize,
    /// Position of the candidate in the enumeration of `(l, m, weight)`.
    pub ordinal: usize,
    /// Number of physical qubits, `2 * l * m`.
    pub n_phys_qubits: usize,
    /// Number of logical qubits `k`.
    pub n_log_qubits: usize,
    /// Logical Z operator basis, `k x n`.
    pub lz: BitMatrix,
    /// Logical X operator basis, `k x n`.
    pub lx: BitMatrix,
    /// Net encoding rate `k / (2 n)`.
    pub encoding_rate: f64,
    /// Human readable description of polynomial A, e.g. `x3 + y1 + y2`.
    pub a_poly_sum: String,
    /// Human readable description of polynomial B.
    pub b_poly_sum: String,
    /// Canonical SHA-256 hash of the check matrices.
    pub code_hash: String,
    /// Terms of polynomial A.
    pub a_terms: Vec<PolynomialTerm>,
    /// Terms of polynomial B.
    pub b_terms: Vec<PolynomialTerm>,
    /// Distance, filled in by the distance pass.
    #[serde(default)]
    pub distance: Option<DistanceOutcome>,
}

impl CodeConfig {
    /// Number of logical qubits as counted from the logical Z basis.
    pub fn k(&self) -> usize {
        self.lz.rows()
    }
}
