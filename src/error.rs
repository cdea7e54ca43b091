use thiserror::Error;

/// Rejected detector configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("local_cut_confidence must be in (0, 1], got {0}")]
    InvalidConfidence(f64),
    #[error("min_cut_len must be at least 1")]
    ZeroMinCutLen,
    #[error("window_len must be at least 1")]
    ZeroWindowLen,
    #[error("merge_threshold must be at least 1")]
    ZeroMergeThreshold,
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
