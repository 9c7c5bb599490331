use std::fmt;

use bbc_core::{BbcError, BitMatrix, EchelonBasis, ErrorInfo};

use crate::hash;

/// Validates a pair of check matrices as a CSS code.
///
/// Implementations must be safe to share between worker threads; the search
/// calls `validate` concurrently for every candidate of a `(l, m)` pair.
pub trait CodeValidator: Send + Sync {
    /// Checks that `hx` and `hz` commute and, when they do, returns the code.
    fn validate(&self, hx: &BitMatrix, hz: &BitMatrix) -> Result<Validation, BbcError>;
}

/// Outcome of [`CodeValidator::validate`].
#[derive(Debug, Clone)]
pub enum Validation {
    /// The matrices define a CSS code.
    Css(CssCode),
    /// Row `x_row` of `hx` has odd overlap with row `z_row` of `hz`.
    Anticommuting {
        /// Offending X check.
        x_row: usize,
        /// Offending Z check.
        z_row: usize,
    },
}

/// Default GF(2) validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssValidator {
    verbose: bool,
}

impl CssValidator {
    /// Creates a validator; `verbose` routes code parameters to `log::debug!`.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl CodeValidator for CssValidator {
    fn validate(&self, hx: &BitMatrix, hz: &BitMatrix) -> Result<Validation, BbcError> {
        if hx.cols() != hz.cols() {
            let info = ErrorInfo::new("shape-mismatch", "hx and hz must have the same width")
                .with_context("hx_cols", hx.cols().to_string())
                .with_context("hz_cols", hz.cols().to_string());
            return Err(BbcError::Code(info));
        }
        let product = hx.mul_transpose(hz)?;
        if !product.is_zero() {
            for x_row in 0..product.rows() {
                if let Some(&z_row) = product.row_support(x_row).first() {
                    if self.verbose {
                        log::debug!("checks anticommute: x_row={x_row} z_row={z_row}");
                    }
                    return Ok(Validation::Anticommuting { x_row, z_row });
                }
            }
        }
        let code = CssCode::from_commuting(hx.clone(), hz.clone());
        if self.verbose {
            log::debug!(
                "css code n={} k={} rank_x={} rank_z={}",
                code.n(),
                code.k(),
                code.rank_x(),
                code.rank_z()
            );
        }
        Ok(Validation::Css(code))
    }
}

/// Logical operator bases of a CSS code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalBasis {
    /// Logical X operators, `k x n`, commuting with every Z check.
    pub lx: BitMatrix,
    /// Logical Z operators, `k x n`, commuting with every X check.
    pub lz: BitMatrix,
}

/// CSS code with commuting check matrices.
#[derive(Clone)]
pub struct CssCode {
    hx: BitMatrix,
    hz: BitMatrix,
    rank_x: usize,
    rank_z: usize,
}

impl fmt::Debug for CssCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CssCode")
            .field("n", &self.n())
            .field("k", &self.k())
            .field("rank_x", &self.rank_x)
            .field("rank_z", &self.rank_z)
            .finish_non_exhaustive()
    }
}

impl CssCode {
    /// Builds a code, failing with `css-orthogonality-failed` when the checks
    /// anticommute.
    pub fn new(hx: BitMatrix, hz: BitMatrix) -> Result<Self, BbcError> {
        match CssValidator::default().validate(&hx, &hz)? {
            Validation::Css(code) => Ok(code),
            Validation::Anticommuting { x_row, z_row } => {
                let info = ErrorInfo::new(
                    "css-orthogonality-failed",
                    "X/Z check pair anticommutes",
                )
                .with_context("x_index", x_row.to_string())
                .with_context("z_index", z_row.to_string());
                Err(BbcError::Code(info))
            }
        }
    }

    fn from_commuting(hx: BitMatrix, hz: BitMatrix) -> Self {
        let rank_x = hx.rank();
        let rank_z = hz.rank();
        Self {
            hx,
            hz,
            rank_x,
            rank_z,
        }
    }

    /// Number of physical qubits.
    pub fn n(&self) -> usize {
        self.hx.cols()
    }

    /// Number of logical qubits, `n - rank(hx) - rank(hz)`.
    pub fn k(&self) -> usize {
        self.n() - self.rank_x - self.rank_z
    }

    /// GF(2) rank of the X checks.
    pub fn rank_x(&self) -> usize {
        self.rank_x
    }

    /// GF(2) rank of the Z checks.
    pub fn rank_z(&self) -> usize {
        self.rank_z
    }

    /// X check matrix.
    pub fn hx(&self) -> &BitMatrix {
        &self.hx
    }

    /// Z check matrix.
    pub fn hz(&self) -> &BitMatrix {
        &self.hz
    }

    /// Canonical structural hash of the check matrices.
    pub fn canonical_hash(&self) -> String {
        hash::canonical_code_hash(self)
    }

    /// Computes symplectically paired logical bases: `lx` spans
    /// `ker(hz) / rowspace(hx)` and `lz` spans `ker(hx) / rowspace(hz)`.
    pub fn logical_operators(&self) -> Result<LogicalBasis, BbcError> {
        let k = self.k();
        let lx = complement(&self.hz.nullspace(), &self.hx)?;
        let lz = complement(&self.hx.nullspace(), &self.hz)?;
        if lx.rows() != k || lz.rows() != k {
            let info = ErrorInfo::new(
                "logical-count-mismatch",
                "logical basis size differs from n - rank(hx) - rank(hz)",
            )
            .with_context("k", k.to_string())
            .with_context("lx_rows", lx.rows().to_string())
            .with_context("lz_rows", lz.rows().to_string());
            return Err(BbcError::Code(info));
        }
        if !self.hz.mul_transpose(&lx)?.is_zero() || !self.hx.mul_transpose(&lz)?.is_zero() {
            let info = ErrorInfo::new(
                "logical-not-commuting",
                "logical operators must commute with the opposite checks",
            );
            return Err(BbcError::Code(info));
        }
        let pairing_rank = lx.mul_transpose(&lz)?.rank();
        if pairing_rank != k {
            let info = ErrorInfo::new(
                "logical-pairing-degenerate",
                "lx · lzᵗ does not have full rank",
            )
            .with_context("k", k.to_string())
            .with_context("rank", pairing_rank.to_string());
            return Err(BbcError::Code(info));
        }
        Ok(LogicalBasis { lx, lz })
    }
}

/// Rows of `kernel` that extend the row span of `span`, in kernel order.
fn complement(kernel: &BitMatrix, span: &BitMatrix) -> Result<BitMatrix, BbcError> {
    let mut basis = EchelonBasis::from_matrix(span);
    let mut picked = Vec::new();
    for row in 0..kernel.rows() {
        let words = kernel.row_words(row);
        if basis.insert(words) {
            picked.push(words.to_vec());
        }
    }
    BitMatrix::from_row_words(kernel.cols(), &picked)
}
