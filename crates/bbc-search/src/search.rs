use std::collections::BTreeSet;

use bbc_code::{CodeValidator, CssValidator, GeneratorSet};
use bbc_core::{BbcError, CodeConfig, ErrorInfo};
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enumerate::PolynomialEnumerator;
use crate::filter::RateFilter;
use crate::plan::SearchPlan;
use crate::synth::{CandidateOutcome, CodeSynthesizer, Rejection};

/// A `(l, m)` pair whose generators could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPair {
    /// Order of the `x` group.
    pub l: usize,
    /// Order of the `y` group.
    pub m: usize,
    /// Error code and message.
    pub reason: String,
}

/// Candidate tallies accumulated over a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCounters {
    /// Candidates synthesised.
    pub examined: usize,
    /// Candidates kept.
    pub accepted: usize,
    /// Candidates whose checks anticommute.
    pub not_css: usize,
    /// Valid codes at or below the rate threshold.
    pub below_rate: usize,
    /// Candidates that raised an error.
    pub failed: usize,
}

impl SearchCounters {
    fn merge(mut self, other: Self) -> Self {
        self.examined += other.examined;
        self.accepted += other.accepted;
        self.not_css += other.not_css;
        self.below_rate += other.below_rate;
        self.failed += other.failed;
        self
    }
}

/// Result of a search pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Accepted configurations ordered by `(l, m, weight, ordinal)`.
    pub configs: Vec<CodeConfig>,
    /// Pairs skipped because generator construction failed.
    pub skipped_pairs: Vec<SkippedPair>,
    /// Candidate tallies.
    pub counters: SearchCounters,
    /// Number of structurally distinct accepted codes.
    pub distinct_codes: usize,
}

#[derive(Default)]
struct Tally {
    counters: SearchCounters,
    accepted: Vec<CodeConfig>,
}

impl Tally {
    fn merge(mut self, other: Self) -> Self {
        self.counters = self.counters.merge(other.counters);
        self.accepted.extend(other.accepted);
        self
    }
}

/// Runs the search with the default CSS validator.
pub fn search(plan: &SearchPlan) -> Result<SearchReport, BbcError> {
    search_with(plan, &CssValidator::new(plan.verbose))
}

/// Runs the search with a caller supplied validator.
///
/// Malformed plans fail immediately. Failures inside a `(l, m)` pair or a
/// single candidate are logged and skipped.
pub fn search_with(
    plan: &SearchPlan,
    validator: &dyn CodeValidator,
) -> Result<SearchReport, BbcError> {
    plan.validate()?;
    let filter = plan.rate_filter()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(plan.scheduler.parallelism)
        .build()
        .map_err(|err| BbcError::Config(ErrorInfo::new("thread-pool", err.to_string())))?;

    let pairs = plan.pairs();
    let results: Vec<Result<Tally, SkippedPair>> = pool.install(|| {
        pairs
            .par_iter()
            .map(|&(l, m)| search_pair(plan, l, m, validator, filter))
            .collect()
    });

    let mut tally = Tally::default();
    let mut skipped_pairs = Vec::new();
    for result in results {
        match result {
            Ok(pair_tally) => tally = tally.merge(pair_tally),
            Err(skipped) => skipped_pairs.push(skipped),
        }
    }

    let mut configs = tally.accepted;
    configs.sort_by_key(|config| (config.l, config.m, config.weight, config.ordinal));
    let distinct_codes = configs
        .iter()
        .map(|config| config.code_hash.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    Ok(SearchReport {
        configs,
        skipped_pairs,
        counters: tally.counters,
        distinct_codes,
    })
}

fn search_pair(
    plan: &SearchPlan,
    l: usize,
    m: usize,
    validator: &dyn CodeValidator,
    filter: RateFilter,
) -> Result<Tally, SkippedPair> {
    let generators = GeneratorSet::build(l, m).map_err(|err| {
        warn!("skipping pair l={l} m={m}: generator construction failed: {err}");
        SkippedPair {
            l,
            m,
            reason: err.to_string(),
        }
    })?;
    let synth = CodeSynthesizer::new(&generators, validator, filter);

    let mut tally = Tally::default();
    for weight in plan.weight.as_range() {
        let enumerator = match PolynomialEnumerator::new(
            weight,
            plan.exponents_a.as_range(),
            plan.exponents_b.as_range(),
        ) {
            Ok(enumerator) => enumerator,
            Err(err) => {
                warn!("skipping weight {weight} for l={l} m={m}: {err}");
                continue;
            }
        };
        debug!(
            "searching l={l} m={m} weight={weight}: {} candidates",
            enumerator.len()
        );
        let weight_tally = (0..enumerator.len())
            .into_par_iter()
            .filter_map(|ordinal| enumerator.get(ordinal))
            .map(|assignment| {
                let mut local = Tally::default();
                local.counters.examined = 1;
                match synth.synthesize(&assignment) {
                    CandidateOutcome::Accepted(config) => {
                        local.counters.accepted = 1;
                        local.accepted.push(*config);
                    }
                    CandidateOutcome::Rejected(Rejection::NotCss { .. }) => {
                        local.counters.not_css = 1;
                    }
                    CandidateOutcome::Rejected(Rejection::BelowRate { .. }) => {
                        local.counters.below_rate = 1;
                    }
                    CandidateOutcome::Failed(err) => {
                        warn!(
                            "candidate failed (l={l}, m={m}, weight={weight}, ordinal={}, A=[{}], B=[{}], powers_a={:?}, powers_b={:?}): {err}",
                            assignment.ordinal,
                            assignment.a,
                            assignment.b,
                            assignment.a.exponents(),
                            assignment.b.exponents(),
                        );
                        local.counters.failed = 1;
                    }
                }
                local
            })
            .reduce(Tally::default, Tally::merge);
        tally = tally.merge(weight_tally);
    }
    Ok(tally)
}
