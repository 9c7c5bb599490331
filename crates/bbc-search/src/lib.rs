#![deny(missing_docs)]
#![doc = "Parameter-space search for bivariate bicycle codes: enumeration of polynomial pairs, candidate synthesis, rate filtering and the parallel driver tying them together."]

/// Mixed-radix enumeration of polynomial pairs.
mod enumerate;
/// Net encoding rate threshold.
mod filter;
/// Search plan ranges, loading and validation.
mod plan;
/// Parallel driver over `(l, m)` pairs.
mod search;
/// Candidate construction and classification.
mod synth;

pub use enumerate::{Assignment, Assignments, PolynomialEnumerator};
pub use filter::{net_encoding_rate, RateFilter, DEFAULT_RATE_THRESHOLD};
pub use plan::{RangeSpec, Scheduler, SearchPlan};
pub use search::{search, search_with, SearchCounters, SearchReport, SkippedPair};
pub use synth::{CandidateOutcome, CodeSynthesizer, Rejection};
