use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Parameters of a drift-detecting stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Transactions per freshly sealed window bucket. Detection runs once
    /// every `window_len` transactions.
    pub window_len: usize,
    /// How many window buckets may share a size before the two oldest of
    /// that size are merged.
    pub merge_threshold: usize,
    /// Minimum number of transactions on each side of a cut.
    pub min_cut_len: usize,
    /// Bounds the false-positive rate of a single cut. Must be in `(0, 1]`;
    /// smaller values demand stronger evidence.
    pub local_cut_confidence: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            window_len: 50,
            merge_threshold: 2,
            min_cut_len: 20,
            local_cut_confidence: 0.05,
        }
    }
}

impl DriftConfig {
    /// Checks every parameter against its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.local_cut_confidence > 0.0 && self.local_cut_confidence <= 1.0) {
            return Err(ConfigError::InvalidConfidence(self.local_cut_confidence));
        }
        if self.min_cut_len == 0 {
            return Err(ConfigError::ZeroMinCutLen);
        }
        if self.window_len == 0 {
            return Err(ConfigError::ZeroWindowLen);
        }
        if self.merge_threshold == 0 {
            return Err(ConfigError::ZeroMergeThreshold);
        }
        Ok(())
    }

    /// Parses a JSON object and validates it. Missing fields take their
    /// default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
