use thiserror::Error;

/// Rejected controller configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("decision interval must lie in [{min}, {max}] seconds, got {value}")]
    DecisionInterval { value: f32, min: f32, max: f32 },
    #[error("wait timer limit must be positive and finite, got {0}")]
    WaitTimerLimit(f32),
    #[error("reward weight `{0}` must be finite and non-negative")]
    RewardWeight(&'static str),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure while handing an episode record to a reporter.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("report i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialise episode record: {0}")]
    Serialize(#[from] serde_json::Error),
}
