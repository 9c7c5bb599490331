use bbc_core::BitMatrix;
use sha2::{Digest, Sha256};

use crate::css::CssCode;

fn update_matrix(hasher: &mut Sha256, matrix: &BitMatrix) {
    hasher.update((matrix.rows() as u64).to_le_bytes());
    hasher.update((matrix.cols() as u64).to_le_bytes());
    for row in 0..matrix.rows() {
        let support = matrix.row_support(row);
        hasher.update((support.len() as u64).to_le_bytes());
        for col in support {
            hasher.update((col as u64).to_le_bytes());
        }
    }
}

/// Computes the canonical structural hash for a CSS code from its check
/// matrices, in row order.
pub fn canonical_code_hash(code: &CssCode) -> String {
    let mut hasher = Sha256::new();
    hasher.update((code.n() as u64).to_le_bytes());
    hasher.update((code.rank_x() as u64).to_le_bytes());
    hasher.update((code.rank_z() as u64).to_le_bytes());
    update_matrix(&mut hasher, code.hx());
    update_matrix(&mut hasher, code.hz());

    let digest = hasher.finalize();
    digest
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<String>()
}
