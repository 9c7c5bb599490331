use bbc_code::{bicycle_checks, CodeValidator, GeneratorSet, Validation};
use bbc_core::{BbcError, CodeConfig};

use crate::enumerate::Assignment;
use crate::filter::{net_encoding_rate, RateFilter};

/// Why a well-formed candidate was not kept.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The check matrices anticommute.
    NotCss {
        /// Offending X check.
        x_row: usize,
        /// Offending Z check.
        z_row: usize,
    },
    /// The net encoding rate does not exceed the threshold.
    BelowRate {
        /// Computed net encoding rate.
        rate: f64,
    },
}

/// Typed outcome of synthesising one candidate.
#[derive(Debug, Clone)]
pub enum CandidateOutcome {
    /// Valid code above the rate threshold.
    Accepted(Box<CodeConfig>),
    /// Valid input that did not pass validation or the filter.
    Rejected(Rejection),
    /// Matrix construction or validation raised an error.
    Failed(BbcError),
}

/// Builds `hx`/`hz` for enumerator assignments of one `(l, m)` pair and runs
/// them through the validator and the rate filter.
pub struct CodeSynthesizer<'a> {
    generators: &'a GeneratorSet,
    validator: &'a dyn CodeValidator,
    filter: RateFilter,
}

impl<'a> CodeSynthesizer<'a> {
    /// Creates a synthesizer sharing `generators` read-only.
    pub fn new(
        generators: &'a GeneratorSet,
        validator: &'a dyn CodeValidator,
        filter: RateFilter,
    ) -> Self {
        Self {
            generators,
            validator,
            filter,
        }
    }

    /// Generator set of the pair being searched.
    pub fn generators(&self) -> &GeneratorSet {
        self.generators
    }

    /// Synthesises and classifies a candidate. Never panics on malformed
    /// input; errors are reported as [`CandidateOutcome::Failed`].
    pub fn synthesize(&self, assignment: &Assignment) -> CandidateOutcome {
        match self.try_synthesize(assignment) {
            Ok(outcome) => outcome,
            Err(err) => CandidateOutcome::Failed(err),
        }
    }

    fn try_synthesize(&self, assignment: &Assignment) -> Result<CandidateOutcome, BbcError> {
        let (hx, hz) = bicycle_checks(self.generators, &assignment.a, &assignment.b)?;
        let code = match self.validator.validate(&hx, &hz)? {
            Validation::Css(code) => code,
            Validation::Anticommuting { x_row, z_row } => {
                return Ok(CandidateOutcome::Rejected(Rejection::NotCss { x_row, z_row }));
            }
        };

        let n = code.n();
        let k = code.k();
        let rate = net_encoding_rate(k, n);
        if !self.filter.accepts(k, n) {
            return Ok(CandidateOutcome::Rejected(Rejection::BelowRate { rate }));
        }

        let logicals = code.logical_operators()?;
        let config = CodeConfig {
            l: self.generators.l(),
            m: self.generators.m(),
            weight: assignment.weight(),
            ordinal: assignment.ordinal,
            n_phys_qubits: n,
            n_log_qubits: k,
            lz: logicals.lz,
            lx: logicals.lx,
            encoding_rate: rate,
            a_poly_sum: assignment.a.to_string(),
            b_poly_sum: assignment.b.to_string(),
            code_hash: code.canonical_hash(),
            a_terms: assignment.a.terms().to_vec(),
            b_terms: assignment.b.terms().to_vec(),
            distance: None,
        };
        Ok(CandidateOutcome::Accepted(Box::new(config)))
    }
}

#[cfg(test)]
mod tests {
    use bbc_code::{CssValidator, Polynomial};
    use bbc_core::PolynomialTerm;

    use super::*;

    fn gross_assignment() -> Assignment {
        Assignment {
            ordinal: 0,
            weight_a: 3,
            weight_b: 3,
            a: Polynomial::new(vec![
                PolynomialTerm::x(3),
                PolynomialTerm::y(1),
                PolynomialTerm::y(2),
            ]),
            b: Polynomial::new(vec![
                PolynomialTerm::y(3),
                PolynomialTerm::x(1),
                PolynomialTerm::x(2),
            ]),
        }
    }

    #[test]
    fn accepts_the_72_qubit_code() {
        let generators = GeneratorSet::build(6, 6).unwrap();
        let validator = CssValidator::default();
        let synth = CodeSynthesizer::new(&generators, &validator, RateFilter::default());
        match synth.synthesize(&gross_assignment()) {
            CandidateOutcome::Accepted(config) => {
                assert_eq!(config.n_phys_qubits, 72);
                assert_eq!(config.n_log_qubits, 12);
                assert_eq!(config.k(), 12);
                assert_eq!(config.encoding_rate, 12.0 / 144.0);
                assert_eq!(config.a_poly_sum, "x3 + y1 + y2");
                assert_eq!(config.b_poly_sum, "y3 + x1 + x2");
                assert!(config.distance.is_none());
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn rate_equal_to_threshold_is_rejected() {
        let generators = GeneratorSet::build(6, 6).unwrap();
        let validator = CssValidator::default();
        let filter = RateFilter::new(net_encoding_rate(12, 72)).unwrap();
        let synth = CodeSynthesizer::new(&generators, &validator, filter);
        match synth.synthesize(&gross_assignment()) {
            CandidateOutcome::Rejected(Rejection::BelowRate { rate }) => {
                assert_eq!(rate, filter.threshold());
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn out_of_range_exponent_fails_without_panicking() {
        let generators = GeneratorSet::build(2, 2).unwrap();
        let validator = CssValidator::default();
        let synth = CodeSynthesizer::new(&generators, &validator, RateFilter::default());
        match synth.synthesize(&gross_assignment()) {
            CandidateOutcome::Failed(err) => assert_eq!(err.code(), "exponent-out-of-range"),
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}
