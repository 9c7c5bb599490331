use bbc_code::{bicycle_checks, GeneratorSet, Polynomial};
use bbc_core::{BbcError, BitMatrix, CodeConfig, DistanceOutcome, ErrorInfo};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ilp::{BinaryProgram, SolveOptions};

/// Lowest-weight vector orthogonal to every stabilizer row with odd overlap
/// on one logical operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinWeightWitness {
    /// Hamming weight of `vector`.
    pub weight: usize,
    /// The witness, one byte per qubit.
    pub vector: Vec<u8>,
    /// Search nodes spent by the solver.
    pub nodes: u64,
}

/// Binary slack bits needed to absorb an even sum of at most `weight`.
fn slack_bits(weight: usize) -> usize {
    if weight <= 1 {
        0
    } else {
        (usize::BITS - (weight - 1).leading_zeros()) as usize
    }
}

fn parity_terms(
    program: &mut BinaryProgram,
    support: &[usize],
) -> Result<Vec<(usize, i64)>, BbcError> {
    let slack = program.add_variables(slack_bits(support.len()), 0)?;
    let mut terms: Vec<(usize, i64)> = support.iter().map(|&qubit| (qubit, 1)).collect();
    terms.extend(slack.enumerate().map(|(bit, var)| (var, -(2i64 << bit))));
    Ok(terms)
}

/// Builds the program minimising `|x|` subject to `stab · x = 0` and
/// `logical · x = 1` over GF(2).
///
/// Every parity constraint becomes an integer equality whose even part is
/// absorbed by binary slack variables with coefficients `-2, -4, ...`.
/// The first `n` variables are the qubits.
pub fn formulate(stabilizers: &BitMatrix, logical: &[u8]) -> Result<BinaryProgram, BbcError> {
    let n = stabilizers.cols();
    if logical.len() != n {
        let info = ErrorInfo::new(
            "shape-mismatch",
            "logical operator length differs from the qubit count",
        )
        .with_context("logical_len", logical.len().to_string())
        .with_context("n", n.to_string());
        return Err(BbcError::Solver(info));
    }
    let logical_support: Vec<usize> = logical
        .iter()
        .enumerate()
        .filter(|(_, bit)| **bit & 1 == 1)
        .map(|(qubit, _)| qubit)
        .collect();
    if logical_support.is_empty() {
        return Err(BbcError::Solver(ErrorInfo::new(
            "empty-logical",
            "logical operator has no support",
        )));
    }

    let mut program = BinaryProgram::new();
    program.add_variables(n, 1)?;
    for row in 0..stabilizers.rows() {
        let support = stabilizers.row_support(row);
        if support.is_empty() {
            continue;
        }
        let terms = parity_terms(&mut program, &support)?;
        program.add_equality(&terms, 0)?;
    }
    let terms = parity_terms(&mut program, &logical_support)?;
    program.add_equality(&terms, 1)?;
    Ok(program)
}

/// Solves [`formulate`] exactly.
pub fn min_weight_odd_overlap(
    stabilizers: &BitMatrix,
    logical: &[u8],
    options: &SolveOptions,
) -> Result<MinWeightWitness, BbcError> {
    let n = stabilizers.cols();
    let program = formulate(stabilizers, logical)?;
    let solution = program.solve(options)?;
    let vector: Vec<u8> = solution.assignment[..n].iter().map(|&bit| u8::from(bit)).collect();

    let witness = BitMatrix::from_dense(n, &[vector.as_slice()])?;
    let overlap = logical
        .iter()
        .zip(&vector)
        .filter(|(a, b)| **a & **b & 1 == 1)
        .count();
    if !stabilizers.mul_transpose(&witness)?.is_zero() || overlap % 2 != 1 {
        return Err(BbcError::Solver(ErrorInfo::new(
            "invalid-witness",
            "solver returned a vector violating the parity constraints",
        )));
    }

    Ok(MinWeightWitness {
        weight: witness.row_weight(0),
        vector,
        nodes: solution.nodes,
    })
}

/// Minimum weight over one solve per row of `logicals`, starting from `n`.
///
/// Rows are solved in parallel. Any failed row turns the outcome into
/// [`DistanceOutcome::Failed`] carrying the best bound seen so far.
pub fn code_distance(
    stabilizers: &BitMatrix,
    logicals: &BitMatrix,
    options: &SolveOptions,
) -> DistanceOutcome {
    if logicals.rows() == 0 {
        return DistanceOutcome::Failed {
            reason: "code encodes no logical qubits".to_string(),
            upper_bound: None,
        };
    }
    let results: Vec<Result<MinWeightWitness, BbcError>> = (0..logicals.rows())
        .into_par_iter()
        .map(|row| min_weight_odd_overlap(stabilizers, &logicals.row_dense(row), options))
        .collect();

    let mut distance = stabilizers.cols();
    let mut solved = 0usize;
    let mut first_error = None;
    for (row, result) in results.into_iter().enumerate() {
        match result {
            Ok(witness) => {
                debug!("logical {row}: weight {} after {} nodes", witness.weight, witness.nodes);
                distance = distance.min(witness.weight);
                solved += 1;
            }
            Err(err) => {
                warn!("logical {row}: distance solve failed: {err}");
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        None => DistanceOutcome::Exact { distance },
        Some(err) => DistanceOutcome::Failed {
            reason: err.to_string(),
            upper_bound: (solved > 0).then_some(distance),
        },
    }
}

/// Settings of a distance pass over stored configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceOptions {
    /// Budget per logical operator.
    pub solve: SolveOptions,
    /// Recompute configurations that already carry an exact distance.
    pub recompute: bool,
    /// Worker threads; `0` uses the rayon default.
    pub parallelism: usize,
}

impl Default for DistanceOptions {
    fn default() -> Self {
        Self {
            solve: SolveOptions::default(),
            recompute: false,
            parallelism: 0,
        }
    }
}

/// Tallies of a distance pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceSummary {
    /// Configurations with a fresh exact distance.
    pub computed: usize,
    /// Configurations marked failed.
    pub failed: usize,
    /// Configurations left untouched.
    pub skipped: usize,
}

fn regenerate_hx(config: &CodeConfig) -> Result<BitMatrix, BbcError> {
    let generators = GeneratorSet::build(config.l, config.m)?;
    let a = Polynomial::new(config.a_terms.clone());
    let b = Polynomial::new(config.b_terms.clone());
    let (hx, _) = bicycle_checks(&generators, &a, &b)?;
    if hx.cols() != config.lx.cols() {
        let info = ErrorInfo::new(
            "record-inconsistent",
            "stored logical basis does not match the regenerated checks",
        )
        .with_context("hx_cols", hx.cols().to_string())
        .with_context("lx_cols", config.lx.cols().to_string());
        return Err(BbcError::Code(info));
    }
    Ok(hx)
}

fn config_distance(config: &CodeConfig, options: &SolveOptions) -> DistanceOutcome {
    match regenerate_hx(config) {
        Ok(hx) => code_distance(&hx, &config.lx, options),
        Err(err) => DistanceOutcome::Failed {
            reason: err.to_string(),
            upper_bound: None,
        },
    }
}

/// Fills `distance` on every configuration.
///
/// A failure on one configuration marks it failed and leaves the rest of
/// the pass running. Only thread pool construction is fatal.
pub fn annotate_distances(
    configs: &mut [CodeConfig],
    options: &DistanceOptions,
) -> Result<DistanceSummary, BbcError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.parallelism)
        .build()
        .map_err(|err| BbcError::Config(ErrorInfo::new("thread-pool", err.to_string())))?;

    let summary = pool.install(|| {
        configs
            .par_iter_mut()
            .map(|config| {
                let mut summary = DistanceSummary::default();
                let done = matches!(config.distance, Some(DistanceOutcome::Exact { .. }));
                if done && !options.recompute {
                    summary.skipped = 1;
                    return summary;
                }
                let outcome = config_distance(config, &options.solve);
                match &outcome {
                    DistanceOutcome::Exact { distance } => {
                        debug!(
                            "l={} m={} ordinal={}: [[{}, {}, {distance}]]",
                            config.l,
                            config.m,
                            config.ordinal,
                            config.n_phys_qubits,
                            config.n_log_qubits
                        );
                        summary.computed = 1;
                    }
                    DistanceOutcome::Failed { reason, .. } => {
                        warn!(
                            "distance failed (l={}, m={}, weight={}, ordinal={}, A=[{}], B=[{}]): {reason}",
                            config.l,
                            config.m,
                            config.weight,
                            config.ordinal,
                            config.a_poly_sum,
                            config.b_poly_sum
                        );
                        summary.failed = 1;
                    }
                }
                config.distance = Some(outcome);
                summary
            })
            .reduce(DistanceSummary::default, |a, b| DistanceSummary {
                computed: a.computed + b.computed,
                failed: a.failed + b.failed,
                skipped: a.skipped + b.skipped,
            })
    });
    info!(
        "distance pass: {} computed, {} failed, {} skipped",
        summary.computed, summary.failed, summary.skipped
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slack_widths() {
        assert_eq!(slack_bits(1), 0);
        assert_eq!(slack_bits(2), 1);
        assert_eq!(slack_bits(3), 2);
        assert_eq!(slack_bits(4), 2);
        assert_eq!(slack_bits(5), 3);
        assert_eq!(slack_bits(6), 3);
    }

    #[test]
    fn single_qubit_witness() {
        let stab = BitMatrix::from_dense(3, &[[0u8, 1, 1]]).unwrap();
        let witness = min_weight_odd_overlap(&stab, &[1, 0, 0], &SolveOptions::default()).unwrap();
        assert_eq!(witness.weight, 1);
        assert_eq!(witness.vector, vec![1, 0, 0]);
    }

    #[test]
    fn repetition_code_needs_every_qubit() {
        let stab = BitMatrix::from_dense(3, &[[1u8, 1, 0], [0, 1, 1]]).unwrap();
        let witness = min_weight_odd_overlap(&stab, &[1, 0, 0], &SolveOptions::default()).unwrap();
        assert_eq!(witness.weight, 3);
        assert_eq!(witness.vector, vec![1, 1, 1]);
    }

    #[test]
    fn logical_inside_the_stabilizers_is_infeasible() {
        let stab = BitMatrix::from_dense(2, &[[1u8, 0], [0, 1]]).unwrap();
        let err = min_weight_odd_overlap(&stab, &[1, 1], &SolveOptions::default()).unwrap_err();
        assert_eq!(err.code(), "infeasible");
    }

    #[test]
    fn empty_logical_is_rejected() {
        let stab = BitMatrix::from_dense(2, &[[1u8, 1]]).unwrap();
        let err = formulate(&stab, &[0, 0]).unwrap_err();
        assert_eq!(err.code(), "empty-logical");
        let err = formulate(&stab, &[1]).unwrap_err();
        assert_eq!(err.code(), "shape-mismatch");
    }

    #[test]
    fn zero_rows_add_no_constraints() {
        let stab = BitMatrix::from_dense(3, &[[0u8, 0, 0], [1, 1, 0]]).unwrap();
        let program = formulate(&stab, &[0, 0, 1]).unwrap();
        assert_eq!(program.constraints().len(), 2);
        assert_eq!(program.num_variables(), 3 + 1);
    }
}
