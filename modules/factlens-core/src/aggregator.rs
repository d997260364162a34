// Aggregation policy: rate check → primary fetch → fallback on empty →
// optional news → respond.
//
// Strict precedence: a non-empty primary result suppresses the fallback
// entirely; primary and fallback claims are never merged. Only the two
// distinguished upstream conditions (rate-limited, unauthorized) from the
// primary abort the request; every other source failure is logged and
// treated as an empty outcome.

use std::net::IpAddr;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use factlens_common::{normalize_query, Article, Claim, FactLensError};

use crate::image::ImageResolver;
use crate::rate_limit::{Clock, RateDecision, RateLimiter, SystemClock};
use crate::traits::{ClaimSource, NewsSource, SourceError};

/// Combined payload returned to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResponse {
    pub fact_check_results: Vec<Claim>,
    pub news_results: Vec<Article>,
}

/// Outcome of one source fetch. Kept distinct from an empty claim list so
/// logs preserve "no claims exist" vs "source failed"; client-facing
/// behavior treats both as empty.
enum SourceOutcome {
    Claims(Vec<Claim>),
    Empty,
    Failed,
}

pub struct Aggregator<C: Clock = SystemClock> {
    primary: Arc<dyn ClaimSource>,
    fallback: Arc<dyn ClaimSource>,
    news: Arc<dyn NewsSource>,
    resolver: ImageResolver,
    limiter: RateLimiter<C>,
}

impl<C: Clock> Aggregator<C> {
    pub fn new(
        primary: Arc<dyn ClaimSource>,
        fallback: Arc<dyn ClaimSource>,
        news: Arc<dyn NewsSource>,
        resolver: ImageResolver,
        limiter: RateLimiter<C>,
    ) -> Self {
        Self {
            primary,
            fallback,
            news,
            resolver,
            limiter,
        }
    }

    /// Run the full pipeline for one client request.
    pub async fn fact_check(
        &self,
        client: IpAddr,
        raw_query: &str,
        include_news: bool,
    ) -> Result<AggregateResponse, FactLensError> {
        let query = normalize_query(raw_query).ok_or_else(|| {
            FactLensError::InvalidQuery("Please provide a query to fact-check".to_string())
        })?;

        if let RateDecision::Denied { retry_after_secs } = self.limiter.check_and_consume(client) {
            info!(%client, retry_after_secs, "Request rejected by rate limiter");
            return Err(FactLensError::RateLimited { retry_after_secs });
        }

        info!(query, include_news, "Fact-check request");

        let mut claims = match self.primary_outcome(&query).await? {
            SourceOutcome::Claims(claims) => claims,
            outcome @ (SourceOutcome::Empty | SourceOutcome::Failed) => {
                if matches!(outcome, SourceOutcome::Empty) {
                    info!(query, "Primary source empty, trying fallback");
                } else {
                    info!(query, "Primary source failed, trying fallback");
                }
                self.fallback_claims(&query).await
            }
        };

        self.resolve_images(&mut claims).await;

        let articles = if include_news {
            self.news_articles(&query).await
        } else {
            Vec::new()
        };

        if claims.is_empty() && articles.is_empty() {
            return Err(FactLensError::NoResults);
        }

        info!(
            query,
            claims = claims.len(),
            articles = articles.len(),
            "Fact-check complete"
        );
        Ok(AggregateResponse {
            fact_check_results: claims,
            news_results: articles,
        })
    }

    /// Primary fetch. Distinguished errors abort; everything else collapses
    /// to `Empty`/`Failed` so the fallback chain proceeds.
    async fn primary_outcome(&self, query: &str) -> Result<SourceOutcome, FactLensError> {
        match self.primary.fetch_claims(query).await {
            Ok(claims) if claims.is_empty() => Ok(SourceOutcome::Empty),
            Ok(claims) => Ok(SourceOutcome::Claims(claims)),
            Err(SourceError::RateLimited { provider }) => {
                warn!(provider, "Primary source rate limited");
                Err(FactLensError::UpstreamRateLimited {
                    provider: provider.to_string(),
                })
            }
            Err(SourceError::Unauthorized { provider }) => {
                warn!(provider, "Primary source rejected credentials");
                Err(FactLensError::UpstreamUnauthorized {
                    provider: provider.to_string(),
                })
            }
            Err(e @ SourceError::Other { .. }) => {
                warn!(error = %e, "Primary source failed, treating as empty");
                Ok(SourceOutcome::Failed)
            }
        }
    }

    /// Fallback fetch. All failures are swallowed here; one failing provider
    /// never prevents the rest of the pipeline from proceeding.
    async fn fallback_claims(&self, query: &str) -> Vec<Claim> {
        match self.fallback.fetch_claims(query).await {
            Ok(claims) => claims,
            Err(e) => {
                warn!(provider = e.provider(), error = %e, "Fallback source failed, treating as empty");
                Vec::new()
            }
        }
    }

    /// News fetch, opt-in and independent of claim results. Failures are
    /// swallowed.
    async fn news_articles(&self, query: &str) -> Vec<Article> {
        match self.news.fetch_articles(query).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(provider = e.provider(), error = %e, "News source failed, treating as empty");
                Vec::new()
            }
        }
    }

    /// Fill in `image_url` for every claim that still needs one, fanning the
    /// per-claim page scrapes out concurrently. Claims whose adapter already
    /// set an image (the fallback scorer) are left alone.
    async fn resolve_images(&self, claims: &mut [Claim]) {
        let pending: Vec<usize> = claims
            .iter()
            .enumerate()
            .filter(|(_, c)| c.image_url.is_empty())
            .map(|(i, _)| i)
            .collect();

        let resolutions = join_all(pending.iter().map(|&i| {
            let claim = &claims[i];
            self.resolver.resolve(&claim.source_url, &claim.publisher)
        }))
        .await;

        for (i, image_url) in pending.into_iter().zip(resolutions) {
            claims[i].image_url = image_url;
        }
    }
}
