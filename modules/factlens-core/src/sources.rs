// Source adapters: one per upstream provider, each normalizing that
// provider's response shape into the common claim/article records.

use async_trait::async_trait;
use tracing::debug;

use claimbuster_client::ClaimBusterClient;
use factchecktools_client::FactCheckToolsClient;
use factlens_common::{Article, Claim, NO_SOURCE_URL, UNKNOWN};
use gnews_client::GNewsClient;

use crate::image::proxy_url;
use crate::traits::{ClaimSource, NewsSource, SourceError};

/// Page size requested from the primary provider.
const CLAIM_PAGE_SIZE: u32 = 10;

/// Articles requested from the news provider.
const NEWS_MAX: u32 = 5;

/// Minimum ClaimBuster score for a sentence to surface as check-worthy.
const WORTHINESS_THRESHOLD: f64 = 0.5;

// --- Primary: Google Fact Check Tools ---

pub struct FactCheckToolsSource {
    client: FactCheckToolsClient,
}

impl FactCheckToolsSource {
    pub fn new(client: FactCheckToolsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClaimSource for FactCheckToolsSource {
    async fn fetch_claims(&self, query: &str) -> Result<Vec<Claim>, SourceError> {
        let records = self
            .client
            .search_claims(query, CLAIM_PAGE_SIZE)
            .await
            .map_err(|e| SourceError::from_status(self.provider(), e.status(), e.to_string()))?;

        let claims = records
            .into_iter()
            .map(|record| {
                let review = record.claim_review.first();
                Claim {
                    claim_text: record.text.unwrap_or_else(|| UNKNOWN.to_string()),
                    claimant: record.claimant.unwrap_or_else(|| UNKNOWN.to_string()),
                    date: record.claim_date.unwrap_or_else(|| UNKNOWN.to_string()),
                    publisher: review
                        .and_then(|r| r.publisher.as_ref())
                        .and_then(|p| p.name.clone())
                        .unwrap_or_else(|| UNKNOWN.to_string()),
                    rating: review
                        .and_then(|r| r.textual_rating.clone())
                        .unwrap_or_else(|| UNKNOWN.to_string()),
                    source_url: review
                        .and_then(|r| r.url.clone())
                        .unwrap_or_else(|| NO_SOURCE_URL.to_string()),
                    // Filled in by the image resolver.
                    image_url: String::new(),
                }
            })
            .collect::<Vec<_>>();

        debug!(query, count = claims.len(), "Primary source returned claims");
        Ok(claims)
    }

    fn provider(&self) -> &'static str {
        "Google Fact Check"
    }
}

// --- Fallback: ClaimBuster check-worthiness scorer ---

pub struct ClaimBusterSource {
    client: ClaimBusterClient,
    placeholder_image: String,
}

impl ClaimBusterSource {
    /// `placeholder_image` is set directly on produced claims; there is no
    /// real article behind a scored sentence to scrape.
    pub fn new(client: ClaimBusterClient, placeholder_image: String) -> Self {
        Self {
            client,
            placeholder_image,
        }
    }
}

#[async_trait]
impl ClaimSource for ClaimBusterSource {
    async fn fetch_claims(&self, query: &str) -> Result<Vec<Claim>, SourceError> {
        let sentences = self
            .client
            .score_text(query)
            .await
            .map_err(|e| SourceError::from_status(self.provider(), e.status(), e.to_string()))?;

        let claims = sentences
            .into_iter()
            .filter(|s| s.score > WORTHINESS_THRESHOLD)
            .map(|s| Claim {
                claim_text: s.text,
                claimant: "N/A".to_string(),
                date: UNKNOWN.to_string(),
                publisher: "ClaimBuster".to_string(),
                rating: format!("Check-worthiness score: {:.2}", s.score),
                source_url: NO_SOURCE_URL.to_string(),
                image_url: self.placeholder_image.clone(),
            })
            .collect::<Vec<_>>();

        debug!(query, count = claims.len(), "Fallback source returned check-worthy claims");
        Ok(claims)
    }

    fn provider(&self) -> &'static str {
        "ClaimBuster"
    }
}

// --- News sidebar: GNews ---

pub struct GNewsSource {
    client: GNewsClient,
}

impl GNewsSource {
    pub fn new(client: GNewsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NewsSource for GNewsSource {
    async fn fetch_articles(&self, query: &str) -> Result<Vec<Article>, SourceError> {
        let records = self
            .client
            .search(query, NEWS_MAX)
            .await
            .map_err(|e| SourceError::from_status(self.provider(), e.status(), e.to_string()))?;

        let articles = records
            .into_iter()
            .map(|record| Article {
                title: record.title.unwrap_or_default(),
                description: record.description.unwrap_or_default(),
                url: record.url.unwrap_or_default(),
                image_url: record.image.as_deref().map(proxy_url),
                published_at: record.published_at.unwrap_or_default(),
                source: record
                    .source
                    .and_then(|s| s.name)
                    .unwrap_or_else(|| UNKNOWN.to_string()),
            })
            .collect::<Vec<_>>();

        debug!(query, count = articles.len(), "News source returned articles");
        Ok(articles)
    }

    fn provider(&self) -> &'static str {
        "GNews"
    }
}
