use std::convert::Infallible;
use std::str::FromStr;

use crate::error::{Error, Result};

/// How many candidate points the first-anchor search samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SamplingMode {
    /// `floor(sqrt(N))` points.
    #[default]
    Sqrt,
    /// Every point, in index order. Consumes no randomness.
    All,
    /// A fixed number of points, clamped to `N`.
    Count(usize),
    /// A fraction of `N`, in `(0, 1]`.
    Fraction(f64),
    /// One point, paired with itself.
    Single,
}

impl SamplingMode {
    /// Number of candidates to draw from a dataset of `n` points, always in `[1, n]`
    /// for non-empty datasets.
    pub fn sample_size(&self, n: usize) -> usize {
        let size = match *self {
            SamplingMode::Sqrt => (n as f64).sqrt().floor() as usize,
            SamplingMode::All => n,
            SamplingMode::Count(c) => c,
            SamplingMode::Fraction(f) => (f * n as f64).floor() as usize,
            SamplingMode::Single => 1,
        };
        size.clamp(1, n.max(1))
    }
}

/// Parses the textual forms experiment drivers pass around: `"sqrt"`,
/// `"all"`, an integer count, or a real fraction. Anything else falls back
/// to [`SamplingMode::Single`].
impl FromStr for SamplingMode {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("sqrt") {
            return Ok(SamplingMode::Sqrt);
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(SamplingMode::All);
        }
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            // counts too large for usize saturate; sample_size clamps them to n
            return Ok(SamplingMode::Count(s.parse::<usize>().unwrap_or(usize::MAX)));
        }
        if let Ok(f) = s.parse::<f64>() {
            return Ok(SamplingMode::Fraction(f));
        }
        Ok(SamplingMode::Single)
    }
}

/// Configuration options for PR clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct PrClusteringConfig {
    /// Number of clusters requested. Anchor pairs fitted: `n_clusters / 2`.
    pub n_clusters: usize,
    /// Margin threshold scale applied to each pair's inter-anchor distance.
    pub alpha: f64,
    /// Candidate sampling for the first anchor.
    pub sampling_mode: SamplingMode,
    /// Measure the nearest-center search against running centroids rather than
    /// the raw anchors. Only meaningful together with `use_centroids`.
    pub use_margin_of_min_distance: bool,
    /// Track a running centroid per label during prediction.
    pub use_centroids: bool,
    /// Seed for the first-anchor sampling. `None` draws from entropy.
    pub random_seed: Option<u64>,
}

impl PrClusteringConfig {
    /// Create a new config with default values for alpha (0.25) and sampling (`Sqrt`).
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            alpha: 0.25,
            sampling_mode: SamplingMode::Sqrt,
            use_margin_of_min_distance: false,
            use_centroids: false,
            random_seed: None,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_sampling_mode(mut self, sampling_mode: SamplingMode) -> Self {
        self.sampling_mode = sampling_mode;
        self
    }

    pub fn with_margin_of_min_distance(mut self, enabled: bool) -> Self {
        self.use_margin_of_min_distance = enabled;
        self
    }

    pub fn with_centroids(mut self, enabled: bool) -> Self {
        self.use_centroids = enabled;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Number of anchor pairs a fit produces.
    pub fn n_pairs(&self) -> usize {
        self.n_clusters / 2
    }

    /// Checks the options that do not depend on the dataset.
    pub fn validate(&self) -> Result<()> {
        if self.n_clusters < 2 {
            return Err(Error::InvalidConfiguration(format!(
                "n_clusters must be >= 2, got {}",
                self.n_clusters
            )));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "alpha must be finite and >= 0, got {}",
                self.alpha
            )));
        }
        match self.sampling_mode {
            SamplingMode::Count(0) => {
                return Err(Error::InvalidConfiguration(
                    "sampling count must be > 0".into(),
                ))
            }
            SamplingMode::Fraction(f) if !(f > 0.0 && f <= 1.0) => {
                return Err(Error::InvalidConfiguration(format!(
                    "sampling fraction must be in (0, 1], got {}",
                    f
                )))
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PrClusteringConfig::new(4);
        assert_eq!(config.alpha, 0.25);
        assert_eq!(config.sampling_mode, SamplingMode::Sqrt);
        assert!(!config.use_centroids);
        assert!(!config.use_margin_of_min_distance);
        assert_eq!(config.random_seed, None);
        assert_eq!(config.n_pairs(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_options() {
        assert!(matches!(
            PrClusteringConfig::new(1).validate(),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(PrClusteringConfig::new(2).with_alpha(-0.1).validate().is_err());
        assert!(PrClusteringConfig::new(2).with_alpha(f64::NAN).validate().is_err());
        assert!(PrClusteringConfig::new(2)
            .with_sampling_mode(SamplingMode::Count(0))
            .validate()
            .is_err());
        assert!(PrClusteringConfig::new(2)
            .with_sampling_mode(SamplingMode::Fraction(1.5))
            .validate()
            .is_err());
    }

    #[test]
    fn test_sample_size() {
        assert_eq!(SamplingMode::Sqrt.sample_size(10), 3);
        assert_eq!(SamplingMode::Sqrt.sample_size(2), 1);
        assert_eq!(SamplingMode::All.sample_size(10), 10);
        assert_eq!(SamplingMode::Count(50).sample_size(10), 10);
        assert_eq!(SamplingMode::Count(4).sample_size(10), 4);
        assert_eq!(SamplingMode::Fraction(0.5).sample_size(9), 4);
        assert_eq!(SamplingMode::Fraction(0.01).sample_size(9), 1);
        assert_eq!(SamplingMode::Single.sample_size(9), 1);
    }

    #[test]
    fn test_parse_sampling_mode() {
        assert_eq!("sqrt".parse::<SamplingMode>().unwrap(), SamplingMode::Sqrt);
        assert_eq!("ALL".parse::<SamplingMode>().unwrap(), SamplingMode::All);
        assert_eq!("12".parse::<SamplingMode>().unwrap(), SamplingMode::Count(12));
        assert_eq!(
            "0.3".parse::<SamplingMode>().unwrap(),
            SamplingMode::Fraction(0.3)
        );
        assert_eq!("none".parse::<SamplingMode>().unwrap(), SamplingMode::Single);
    }

    #[test]
    fn test_parse_overflowing_count() {
        let mode = "99999999999999999999999".parse::<SamplingMode>().unwrap();
        assert_eq!(mode, SamplingMode::Count(usize::MAX));
        assert_eq!(mode.sample_size(10), 10);
    }
}
