use anyhow::{bail, Result};

/// Similarity cutoff used when no threshold is configured.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Configuration for segment detection with a tunable threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionConfig {
    /// Samples at or above this similarity count as "hits"
    pub threshold: f64,
}

impl DetectionConfig {
    pub fn new(threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            bail!("threshold must lie in [0, 1], got {threshold}");
        }
        Ok(Self { threshold })
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}
