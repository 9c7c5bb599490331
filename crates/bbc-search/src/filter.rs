use bbc_core::{BbcError, ErrorInfo};

/// Threshold used when a plan leaves `rate_threshold` unset.
pub const DEFAULT_RATE_THRESHOLD: f64 = 1.0 / 15.0;

/// Net encoding rate `k / (2n)` where `n` is the number of physical qubits.
pub fn net_encoding_rate(k: usize, n: usize) -> f64 {
    k as f64 / (2.0 * n as f64)
}

/// Accepts candidates whose net encoding rate is strictly above a threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateFilter {
    threshold: f64,
}

impl RateFilter {
    /// Creates a filter; the threshold must be finite and non-negative.
    pub fn new(threshold: f64) -> Result<Self, BbcError> {
        if !threshold.is_finite() || threshold < 0.0 {
            let info = ErrorInfo::new("invalid-threshold", "rate threshold must be finite and >= 0")
                .with_context("threshold", threshold.to_string());
            return Err(BbcError::Config(info));
        }
        Ok(Self { threshold })
    }

    /// Filter for an optional threshold, falling back to [`DEFAULT_RATE_THRESHOLD`].
    pub fn from_option(threshold: Option<f64>) -> Result<Self, BbcError> {
        Self::new(threshold.unwrap_or(DEFAULT_RATE_THRESHOLD))
    }

    /// The configured threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns true iff `net_encoding_rate(k, n) > threshold`.
    pub fn accepts(&self, k: usize, n: usize) -> bool {
        net_encoding_rate(k, n) > self.threshold
    }
}

impl Default for RateFilter {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_RATE_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_halves_over_physical_qubits() {
        assert_eq!(net_encoding_rate(12, 72), 12.0 / 144.0);
        assert_eq!(net_encoding_rate(0, 72), 0.0);
    }

    #[test]
    fn boundary_is_rejected() {
        let filter = RateFilter::new(net_encoding_rate(12, 72)).unwrap();
        assert!(!filter.accepts(12, 72));
        assert!(filter.accepts(13, 72));
    }

    #[test]
    fn default_threshold_is_one_fifteenth() {
        let filter = RateFilter::default();
        assert_eq!(filter.threshold(), 1.0 / 15.0);
        // 8 / (2 * 60) == 1/15 exactly at the boundary
        assert!(!filter.accepts(8, 60));
        assert!(filter.accepts(12, 72));
        assert_eq!(RateFilter::from_option(None).unwrap(), filter);
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        assert!(RateFilter::new(f64::NAN).is_err());
        assert!(RateFilter::new(-0.5).is_err());
    }
}
