use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////

/// Rejected configuration. Raised by validation before a run starts; no
/// state is explored under a partially configured run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
    #[error("{field} must lie in [0, 1], got {value}")]
    RateOutOfRange { field: &'static str, value: f64 },
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositiveReal { field: &'static str, value: f64 },
    #[error("grammar exposes no effectful rule, cannot generate candidates")]
    EmptyRuleSet,
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Model reduction did not produce a usable sub-grammar. Recoverable:
    /// the caller is expected to retry with a different percentage.
    #[error("model reduction to {percent}% failed: {reason}; pick a different percentage")]
    ModelReduction { percent: f64, reason: String },
}

////////////////////////////////////////////////////////////////////////////////

pub type SearchResult<T> = Result<T, SearchError>;
