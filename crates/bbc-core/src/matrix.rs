//! Dense matrices used by the search: bit-packed GF(2) matrices for parity
//! checks and integer matrices for accumulating generator sums.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{BbcError, ErrorInfo};

const WORD_BITS: usize = 64;

fn words_for(cols: usize) -> usize {
    cols.div_ceil(WORD_BITS)
}

fn shape_mismatch(operation: &str, left: (usize, usize), right: (usize, usize)) -> BbcError {
    let info = ErrorInfo::new("shape-mismatch", "matrix shapes are incompatible")
        .with_context("operation", operation)
        .with_context("left", format!("{}x{}", left.0, left.1))
        .with_context("right", format!("{}x{}", right.0, right.1));
    BbcError::Code(info)
}

fn column_out_of_range(row: usize, col: usize, cols: usize) -> BbcError {
    let info = ErrorInfo::new("column-out-of-range", "row support references a missing column")
        .with_context("row", row.to_string())
        .with_context("column", col.to_string())
        .with_context("cols", cols.to_string());
    BbcError::Code(info)
}

/// Dense matrix over GF(2) with rows packed into 64-bit words.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "SparseRows", try_from = "SparseRows")]
pub struct BitMatrix {
    rows: usize,
    cols: usize,
    stride: usize,
    words: Vec<u64>,
}

/// Serialized form of a [`BitMatrix`]: the support of every row.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SparseRows {
    rows: usize,
    cols: usize,
    support: Vec<Vec<usize>>,
}

impl From<BitMatrix> for SparseRows {
    fn from(matrix: BitMatrix) -> Self {
        let support = (0..matrix.rows).map(|row| matrix.row_support(row)).collect();
        Self {
            rows: matrix.rows,
            cols: matrix.cols,
            support,
        }
    }
}

impl TryFrom<SparseRows> for BitMatrix {
    type Error = BbcError;

    fn try_from(value: SparseRows) -> Result<Self, Self::Error> {
        if value.support.len() != value.rows {
            let info = ErrorInfo::new("row-count-mismatch", "serialized row count is inconsistent")
                .with_context("rows", value.rows.to_string())
                .with_context("support_rows", value.support.len().to_string());
            return Err(BbcError::Serde(info));
        }
        BitMatrix::from_supports(value.cols, &value.support)
    }
}

impl fmt::Debug for BitMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| if self.get(row, col) { '1' } else { '0' })
                    .collect()
            })
            .collect();
        f.debug_struct("BitMatrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("data", &rows)
            .finish()
    }
}

impl BitMatrix {
    /// Creates an all-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        let stride = words_for(cols);
        Self {
            rows,
            cols,
            stride,
            words: vec![0; rows * stride],
        }
    }

    /// Builds a matrix from the column support of every row. Repeated
    /// columns cancel in pairs.
    pub fn from_supports(cols: usize, supports: &[Vec<usize>]) -> Result<Self, BbcError> {
        let mut matrix = Self::zeros(supports.len(), cols);
        for (row, support) in supports.iter().enumerate() {
            for &col in support {
                if col >= cols {
                    return Err(column_out_of_range(row, col, cols));
                }
                matrix.flip(row, col);
            }
        }
        Ok(matrix)
    }

    /// Builds a matrix from dense rows; entries are reduced mod 2.
    pub fn from_dense<R: AsRef<[u8]>>(cols: usize, rows: &[R]) -> Result<Self, BbcError> {
        let mut matrix = Self::zeros(rows.len(), cols);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != cols {
                return Err(shape_mismatch("from_dense", (1, cols), (1, values.len())));
            }
            for (col, value) in values.iter().enumerate() {
                if value % 2 == 1 {
                    matrix.set(row, col, true);
                }
            }
        }
        Ok(matrix)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> bool {
        let word = self.words[row * self.stride + col / WORD_BITS];
        (word >> (col % WORD_BITS)) & 1 == 1
    }

    /// Sets the entry at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        let idx = row * self.stride + col / WORD_BITS;
        let mask = 1u64 << (col % WORD_BITS);
        if value {
            self.words[idx] |= mask;
        } else {
            self.words[idx] &= !mask;
        }
    }

    /// Flips the entry at `(row, col)`.
    pub fn flip(&mut self, row: usize, col: usize) {
        self.words[row * self.stride + col / WORD_BITS] ^= 1u64 << (col % WORD_BITS);
    }

    /// Returns the packed words of a row.
    pub fn row_words(&self, row: usize) -> &[u64] {
        &self.words[row * self.stride..(row + 1) * self.stride]
    }

    /// Hamming weight of a row.
    pub fn row_weight(&self, row: usize) -> usize {
        self.row_words(row)
            .iter()
            .map(|word| word.count_ones() as usize)
            .sum()
    }

    /// Sorted column indices of the ones in a row.
    pub fn row_support(&self, row: usize) -> Vec<usize> {
        let mut support = Vec::new();
        for (idx, &word) in self.row_words(row).iter().enumerate() {
            let mut remaining = word;
            while remaining != 0 {
                let bit = remaining.trailing_zeros() as usize;
                support.push(idx * WORD_BITS + bit);
                remaining &= remaining - 1;
            }
        }
        support
    }

    /// Row as a dense 0/1 vector.
    pub fn row_dense(&self, row: usize) -> Vec<u8> {
        (0..self.cols).map(|col| u8::from(self.get(row, col))).collect()
    }

    /// Returns true when every entry is zero.
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for row in 0..self.rows {
            for col in self.row_support(row) {
                out.set(col, row, true);
            }
        }
        out
    }

    /// Concatenates `right` to the right of `self`.
    pub fn hstack(&self, right: &Self) -> Result<Self, BbcError> {
        if self.rows != right.rows {
            return Err(shape_mismatch(
                "hstack",
                (self.rows, self.cols),
                (right.rows, right.cols),
            ));
        }
        let mut out = Self::zeros(self.rows, self.cols + right.cols);
        for row in 0..self.rows {
            for col in self.row_support(row) {
                out.set(row, col, true);
            }
            for col in right.row_support(row) {
                out.set(row, self.cols + col, true);
            }
        }
        Ok(out)
    }

    /// Computes `self · otherᵗ` over GF(2).
    pub fn mul_transpose(&self, other: &Self) -> Result<Self, BbcError> {
        if self.cols != other.cols {
            return Err(shape_mismatch(
                "mul_transpose",
                (self.rows, self.cols),
                (other.rows, other.cols),
            ));
        }
        let mut out = Self::zeros(self.rows, other.rows);
        for i in 0..self.rows {
            let left = self.row_words(i);
            for j in 0..other.rows {
                let parity = left
                    .iter()
                    .zip(other.row_words(j))
                    .map(|(a, b)| (a & b).count_ones())
                    .sum::<u32>()
                    % 2;
                if parity == 1 {
                    out.set(i, j, true);
                }
            }
        }
        Ok(out)
    }

    /// Rank over GF(2).
    pub fn rank(&self) -> usize {
        self.clone().reduce().len()
    }

    /// Reduced row echelon form together with the pivot columns.
    pub fn row_echelon(&self) -> (Self, Vec<usize>) {
        let mut reduced = self.clone();
        let pivots = reduced.reduce();
        (reduced, pivots)
    }

    /// Basis of `{v : self · v = 0}`, one basis vector per row.
    pub fn nullspace(&self) -> Self {
        let (reduced, pivots) = self.row_echelon();
        let mut is_pivot = vec![false; self.cols];
        for &col in &pivots {
            is_pivot[col] = true;
        }
        let free: Vec<usize> = (0..self.cols).filter(|&col| !is_pivot[col]).collect();
        let mut basis = Self::zeros(free.len(), self.cols);
        for (idx, &free_col) in free.iter().enumerate() {
            basis.set(idx, free_col, true);
            for (pivot_row, &pivot_col) in pivots.iter().enumerate() {
                if reduced.get(pivot_row, free_col) {
                    basis.set(idx, pivot_col, true);
                }
            }
        }
        basis
    }

    /// Builds a matrix from packed rows produced by another matrix of the
    /// same width.
    pub fn from_row_words(cols: usize, rows: &[Vec<u64>]) -> Result<Self, BbcError> {
        let mut out = Self::zeros(rows.len(), cols);
        for (row, words) in rows.iter().enumerate() {
            if words.len() != out.stride {
                return Err(shape_mismatch("from_row_words", (1, cols), (1, words.len())));
            }
            out.words[row * out.stride..(row + 1) * out.stride].copy_from_slice(words);
        }
        Ok(out)
    }

    fn xor_rows(&mut self, dst: usize, src: usize) {
        for k in 0..self.stride {
            let value = self.words[src * self.stride + k];
            self.words[dst * self.stride + k] ^= value;
        }
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for k in 0..self.stride {
            self.words.swap(a * self.stride + k, b * self.stride + k);
        }
    }

    fn reduce(&mut self) -> Vec<usize> {
        let mut pivots = Vec::new();
        let mut pivot_row = 0;
        for col in 0..self.cols {
            if pivot_row == self.rows {
                break;
            }
            let word = col / WORD_BITS;
            let mask = 1u64 << (col % WORD_BITS);
            let Some(found) =
                (pivot_row..self.rows).find(|&r| self.words[r * self.stride + word] & mask != 0)
            else {
                continue;
            };
            self.swap_rows(found, pivot_row);
            for r in 0..self.rows {
                if r != pivot_row && self.words[r * self.stride + word] & mask != 0 {
                    self.xor_rows(r, pivot_row);
                }
            }
            pivots.push(col);
            pivot_row += 1;
        }
        pivots
    }
}

/// Incrementally built echelon basis used to test membership in a row span.
#[derive(Debug, Clone)]
pub struct EchelonBasis {
    cols: usize,
    rows: Vec<(usize, Vec<u64>)>,
}

impl EchelonBasis {
    /// Creates an empty basis for vectors of width `cols`.
    pub fn new(cols: usize) -> Self {
        Self {
            cols,
            rows: Vec::new(),
        }
    }

    /// Seeds the basis with every row of `matrix`.
    pub fn from_matrix(matrix: &BitMatrix) -> Self {
        let mut basis = Self::new(matrix.cols());
        for row in 0..matrix.rows() {
            basis.insert(matrix.row_words(row));
        }
        basis
    }

    /// Number of independent vectors stored.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when no vector has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the vectors.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Inserts `vector` if it is independent of the current span and reports
    /// whether it was.
    pub fn insert(&mut self, vector: &[u64]) -> bool {
        let mut residual = vector.to_vec();
        for (pivot, row) in &self.rows {
            if (residual[pivot / WORD_BITS] >> (pivot % WORD_BITS)) & 1 == 1 {
                for (dst, src) in residual.iter_mut().zip(row) {
                    *dst ^= src;
                }
            }
        }
        let pivot = residual
            .iter()
            .enumerate()
            .find(|(_, word)| **word != 0)
            .map(|(idx, word)| idx * WORD_BITS + word.trailing_zeros() as usize);
        match pivot {
            Some(pivot) => {
                self.rows.push((pivot, residual));
                true
            }
            None => false,
        }
    }
}

/// Dense matrix of non-negative integers. Sums of generator matrices are
/// accumulated here before reduction to GF(2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u32>,
}

impl IntMatrix {
    /// Creates an all-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Identity matrix of order `n`.
    pub fn identity(n: usize) -> Self {
        Self::cyclic_shift(n, 0)
    }

    /// Identity of order `n` with its columns rolled right by `shift`, so
    /// that entry `(r, (r + shift) mod n)` is one.
    pub fn cyclic_shift(n: usize, shift: usize) -> Self {
        let mut out = Self::zeros(n, n);
        for row in 0..n {
            out.data[row * n + (row + shift) % n] = 1;
        }
        out
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.data[row * self.cols + col]
    }

    /// Kronecker product `self ⊗ other`.
    pub fn kron(&self, other: &Self) -> Self {
        let mut out = Self::zeros(self.rows * other.rows, self.cols * other.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                let scale = self.get(r, c);
                if scale == 0 {
                    continue;
                }
                for i in 0..other.rows {
                    for j in 0..other.cols {
                        let row = r * other.rows + i;
                        let col = c * other.cols + j;
                        out.data[row * out.cols + col] = scale * other.get(i, j);
                    }
                }
            }
        }
        out
    }

    /// Entrywise integer addition; overlapping supports accumulate.
    pub fn add_assign(&mut self, other: &Self) -> Result<(), BbcError> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(shape_mismatch(
                "add",
                (self.rows, self.cols),
                (other.rows, other.cols),
            ));
        }
        for (dst, src) in self.data.iter_mut().zip(&other.data) {
            *dst += src;
        }
        Ok(())
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.data[c * out.cols + r] = self.get(r, c);
            }
        }
        out
    }

    /// Reduces every entry mod 2.
    pub fn to_bits(&self) -> BitMatrix {
        let mut out = BitMatrix::zeros(self.rows, self.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.get(r, c) % 2 == 1 {
                    out.set(r, c, true);
                }
            }
        }
        out
    }

    /// Returns true when the matrix is square with exactly one 1 in every
    /// row and column and zeros elsewhere.
    pub fn is_permutation(&self) -> bool {
        if self.rows != self.cols {
            return false;
        }
        if self.data.iter().any(|&v| v > 1) {
            return false;
        }
        let rows_ok =
            (0..self.rows).all(|r| (0..self.cols).map(|c| self.get(r, c)).sum::<u32>() == 1);
        let cols_ok =
            (0..self.cols).all(|c| (0..self.rows).map(|r| self.get(r, c)).sum::<u32>() == 1);
        rows_ok && cols_ok
    }
}
