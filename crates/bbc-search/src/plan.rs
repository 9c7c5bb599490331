use std::fs;
use std::ops::Range;
use std::path::Path;

use bbc_core::{BbcError, ErrorInfo};
use serde::{Deserialize, Serialize};

use crate::enumerate::PolynomialEnumerator;
use crate::filter::RateFilter;

/// Half-open integer range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSpec {
    /// Inclusive lower bound.
    pub start: usize,
    /// Exclusive upper bound.
    pub end: usize,
}

impl RangeSpec {
    /// Creates `[start, end)`.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Range holding exactly `value`.
    pub const fn single(value: usize) -> Self {
        Self::new(value, value + 1)
    }

    /// Returns true when the range holds no value.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The range as a standard library range.
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Thread pool sizing for the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduler {
    /// Worker threads; `0` lets rayon pick one per core.
    #[serde(default = "Scheduler::default_parallelism")]
    pub parallelism: usize,
}

impl Scheduler {
    const fn default_parallelism() -> usize {
        0
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            parallelism: Self::default_parallelism(),
        }
    }
}

/// Parameter space of a search, loadable from YAML or JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPlan {
    /// Orders of the `x` group.
    pub l: RangeSpec,
    /// Orders of the `y` group.
    pub m: RangeSpec,
    /// Total term counts across A and B.
    pub weight: RangeSpec,
    /// Exponents available to terms of A.
    pub exponents_a: RangeSpec,
    /// Exponents available to terms of B.
    pub exponents_b: RangeSpec,
    /// Lower bound (exclusive) on the net encoding rate; defaults to 1/15.
    #[serde(default)]
    pub rate_threshold: Option<f64>,
    /// Parallel execution settings.
    #[serde(default)]
    pub scheduler: Scheduler,
    /// Log validator diagnostics at debug level.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for SearchPlan {
    fn default() -> Self {
        Self {
            l: RangeSpec::single(6),
            m: RangeSpec::single(6),
            weight: RangeSpec::single(6),
            exponents_a: RangeSpec::new(1, 4),
            exponents_b: RangeSpec::new(1, 4),
            rate_threshold: None,
            scheduler: Scheduler::default(),
            verbose: false,
        }
    }
}

impl SearchPlan {
    /// Reads a plan from a `.json` file or, for any other extension, YAML.
    pub fn load(path: &Path) -> Result<Self, BbcError> {
        let text = fs::read_to_string(path).map_err(|err| {
            BbcError::Io(
                ErrorInfo::new("plan-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let plan: SearchPlan = if is_json {
            serde_json::from_str(&text)
                .map_err(|err| BbcError::Config(ErrorInfo::new("plan-json", err.to_string())))?
        } else {
            serde_yaml::from_str(&text)
                .map_err(|err| BbcError::Config(ErrorInfo::new("plan-yaml", err.to_string())))?
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Rejects malformed plans before any work starts.
    pub fn validate(&self) -> Result<(), BbcError> {
        let ranges = [
            ("l", self.l),
            ("m", self.m),
            ("weight", self.weight),
            ("exponents_a", self.exponents_a),
            ("exponents_b", self.exponents_b),
        ];
        for (name, range) in ranges {
            if range.is_empty() {
                let info = ErrorInfo::new("empty-range", "search range is empty")
                    .with_context("field", name)
                    .with_context("range", format!("{}..{}", range.start, range.end))
                    .with_hint("ranges are half-open: use end = start + 1 for a single value");
                return Err(BbcError::Config(info));
            }
        }
        for weight in self.weight.as_range() {
            PolynomialEnumerator::new(
                weight,
                self.exponents_a.as_range(),
                self.exponents_b.as_range(),
            )?;
        }
        self.rate_filter()?;
        Ok(())
    }

    /// Rate filter for this plan.
    pub fn rate_filter(&self) -> Result<RateFilter, BbcError> {
        RateFilter::from_option(self.rate_threshold)
    }

    /// All `(l, m)` pairs in search order.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.l
            .as_range()
            .flat_map(|l| self.m.as_range().map(move |m| (l, m)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_is_the_reference_run() {
        let plan = SearchPlan::default();
        plan.validate().unwrap();
        assert_eq!(plan.pairs(), vec![(6, 6)]);
        assert_eq!(plan.rate_filter().unwrap().threshold(), 1.0 / 15.0);
    }

    #[test]
    fn yaml_defaults_fill_optional_fields() {
        let yaml = "l: {start: 3, end: 5}\nm: {start: 3, end: 4}\nweight: {start: 4, end: 5}\n\
                    exponents_a: {start: 0, end: 3}\nexponents_b: {start: 0, end: 3}\n";
        let plan: SearchPlan = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(plan.rate_threshold, None);
        assert_eq!(plan.scheduler.parallelism, 0);
        assert_eq!(plan.pairs(), vec![(3, 3), (4, 3)]);
    }

    #[test]
    fn malformed_ranges_fail_fast() {
        let plan = SearchPlan {
            weight: RangeSpec::new(6, 6),
            ..SearchPlan::default()
        };
        let err = plan.validate().unwrap_err();
        assert_eq!(err.code(), "empty-range");
        assert_eq!(err.info().context["field"], "weight");

        let plan = SearchPlan {
            weight: RangeSpec::new(1, 3),
            ..SearchPlan::default()
        };
        assert_eq!(plan.validate().unwrap_err().code(), "weight-too-small");

        let plan = SearchPlan {
            rate_threshold: Some(f64::INFINITY),
            ..SearchPlan::default()
        };
        assert_eq!(plan.validate().unwrap_err().code(), "invalid-threshold");
    }
}
