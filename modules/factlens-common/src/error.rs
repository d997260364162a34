use thiserror::Error;

/// Service-level error taxonomy. Only the two upstream conditions that
/// indicate a broken integration (rate-limited, unauthorized) cross adapter
/// boundaries as distinguishable errors; every other per-source failure is
/// absorbed at the adapter so one failing provider never blocks the rest.
#[derive(Error, Debug)]
pub enum FactLensError {
    #[error("{0}")]
    InvalidQuery(String),

    #[error("{provider} API rate limit exceeded. Please try again later.")]
    UpstreamRateLimited { provider: String },

    #[error("Invalid {provider} API key. Please contact the administrator.")]
    UpstreamUnauthorized { provider: String },

    #[error("No fact-checks or news articles found for this query")]
    NoResults,

    #[error("Too many requests. Please try again in {retry_after_secs} seconds.")]
    RateLimited { retry_after_secs: u64 },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
