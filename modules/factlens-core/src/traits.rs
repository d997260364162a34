// Trait abstractions for the aggregator's dependencies.
//
// ClaimSource — one implementation per upstream fact-check provider.
// NewsSource — the optional news sidebar provider.
// PageFetcher — raw HTML retrieval for the image resolver.
//
// These enable deterministic testing with MockClaimSource, MockNewsSource
// and MockPageFetcher: no network, no API keys.

use async_trait::async_trait;
use thiserror::Error;

use factlens_common::{Article, Claim};

/// Failure of a single upstream source. Only `RateLimited` and `Unauthorized`
/// are surfaced to the client; `Other` is absorbed at the aggregation boundary
/// and treated as an empty result so the fallback chain can proceed.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{provider} rate limited the request")]
    RateLimited { provider: &'static str },

    #[error("{provider} rejected the configured credentials")]
    Unauthorized { provider: &'static str },

    #[error("{provider} request failed: {message}")]
    Other {
        provider: &'static str,
        message: String,
    },
}

impl SourceError {
    pub fn provider(&self) -> &'static str {
        match self {
            SourceError::RateLimited { provider }
            | SourceError::Unauthorized { provider }
            | SourceError::Other { provider, .. } => provider,
        }
    }

    /// Build from an upstream HTTP status, mapping the two distinguished
    /// conditions and folding everything else into `Other`.
    pub fn from_status(provider: &'static str, status: Option<u16>, message: String) -> Self {
        match status {
            Some(429) => SourceError::RateLimited { provider },
            Some(403) => SourceError::Unauthorized { provider },
            _ => SourceError::Other { provider, message },
        }
    }
}

#[async_trait]
pub trait ClaimSource: Send + Sync {
    /// Fetch normalized claims for an already-normalized query.
    /// Implementations leave `image_url` empty unless they have no article
    /// to scrape (the fallback scorer sets a placeholder directly).
    async fn fetch_claims(&self, query: &str) -> Result<Vec<Claim>, SourceError>;

    fn provider(&self) -> &'static str;
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_articles(&self, query: &str) -> Result<Vec<Article>, SourceError>;

    fn provider(&self) -> &'static str;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the HTML body of a page. Any failure (timeout, non-200, body
    /// read error) is an `Err`; callers decide the fallback.
    async fn html(&self, url: &str) -> anyhow::Result<String>;
}
