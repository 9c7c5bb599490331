#![deny(missing_docs)]
#![doc = "Exact code distance of stored bivariate bicycle codes: per logical operator, a binary program for the lightest vector that commutes with all X checks yet overlaps the operator an odd number of times. The code distance is the minimum over all logical operators."]

/// Slack-bit formulation and the distance pass over archived records.
mod distance;
/// Exact branch-and-bound solver for small binary programs.
pub mod ilp;

pub use distance::{
    annotate_distances, code_distance, formulate, min_weight_odd_overlap, DistanceOptions,
    DistanceSummary, MinWeightWitness,
};
pub use ilp::{BinaryProgram, LinearConstraint, Solution, SolveOptions};
