// Test mocks for the aggregation pipeline.
//
// Three mocks matching the three trait boundaries:
// - MockClaimSource (ClaimSource) — canned claims or a canned failure, with
//   a call counter for precedence assertions
// - MockNewsSource (NewsSource) — canned articles or a canned failure
// - MockPageFetcher (PageFetcher) — HashMap-based URL→HTML
//
// Plus helpers for constructing claims and the standard publisher table.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use factlens_common::{Article, Claim, NO_SOURCE_URL, UNKNOWN};

use crate::traits::{ClaimSource, NewsSource, PageFetcher, SourceError};

/// Asset origin used across tests.
pub const TEST_ASSET_BASE: &str = "https://factlens.app";

// ---------------------------------------------------------------------------
// MockClaimSource
// ---------------------------------------------------------------------------

enum CannedClaims {
    Claims(Vec<Claim>),
    RateLimited,
    Unauthorized,
    Fail(String),
}

pub struct MockClaimSource {
    provider: &'static str,
    canned: CannedClaims,
    calls: AtomicUsize,
}

impl MockClaimSource {
    pub fn returning(provider: &'static str, claims: Vec<Claim>) -> Self {
        Self {
            provider,
            canned: CannedClaims::Claims(claims),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty(provider: &'static str) -> Self {
        Self::returning(provider, Vec::new())
    }

    pub fn rate_limited(provider: &'static str) -> Self {
        Self {
            provider,
            canned: CannedClaims::RateLimited,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unauthorized(provider: &'static str) -> Self {
        Self {
            provider,
            canned: CannedClaims::Unauthorized,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(provider: &'static str, message: &str) -> Self {
        Self {
            provider,
            canned: CannedClaims::Fail(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `fetch_claims` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClaimSource for MockClaimSource {
    async fn fetch_claims(&self, _query: &str) -> Result<Vec<Claim>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.canned {
            CannedClaims::Claims(claims) => Ok(claims.clone()),
            CannedClaims::RateLimited => Err(SourceError::RateLimited {
                provider: self.provider,
            }),
            CannedClaims::Unauthorized => Err(SourceError::Unauthorized {
                provider: self.provider,
            }),
            CannedClaims::Fail(message) => Err(SourceError::Other {
                provider: self.provider,
                message: message.clone(),
            }),
        }
    }

    fn provider(&self) -> &'static str {
        self.provider
    }
}

// ---------------------------------------------------------------------------
// MockNewsSource
// ---------------------------------------------------------------------------

pub struct MockNewsSource {
    provider: &'static str,
    articles: Result<Vec<Article>, String>,
    calls: AtomicUsize,
}

impl MockNewsSource {
    pub fn returning(provider: &'static str, articles: Vec<Article>) -> Self {
        Self {
            provider,
            articles: Ok(articles),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty(provider: &'static str) -> Self {
        Self::returning(provider, Vec::new())
    }

    pub fn failing(provider: &'static str, message: &str) -> Self {
        Self {
            provider,
            articles: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsSource for MockNewsSource {
    async fn fetch_articles(&self, _query: &str) -> Result<Vec<Article>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.articles {
            Ok(articles) => Ok(articles.clone()),
            Err(message) => Err(SourceError::Other {
                provider: self.provider,
                message: message.clone(),
            }),
        }
    }

    fn provider(&self) -> &'static str {
        self.provider
    }
}

// ---------------------------------------------------------------------------
// MockPageFetcher
// ---------------------------------------------------------------------------

/// HashMap-based page fetcher. Returns `Err` for unregistered URLs.
/// Builder pattern: `.on_page()`.
pub struct MockPageFetcher {
    pages: HashMap<String, String>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    pub fn on_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

impl Default for MockPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn html(&self, url: &str) -> anyhow::Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("MockPageFetcher: no page registered for {url}"))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A claim as the primary adapter would hand it to the resolver: real
/// review URL, image not yet filled in.
pub fn claim(text: &str, publisher: &str, source_url: &str) -> Claim {
    Claim {
        claim_text: text.to_string(),
        claimant: UNKNOWN.to_string(),
        date: "2024-06-01".to_string(),
        publisher: publisher.to_string(),
        rating: "False".to_string(),
        source_url: source_url.to_string(),
        image_url: String::new(),
    }
}

/// A claim as the fallback scorer produces it: no article, placeholder
/// image already set.
pub fn fallback_claim(text: &str, score: f64, placeholder: &str) -> Claim {
    Claim {
        claim_text: text.to_string(),
        claimant: "N/A".to_string(),
        date: UNKNOWN.to_string(),
        publisher: "ClaimBuster".to_string(),
        rating: format!("Check-worthiness score: {score:.2}"),
        source_url: NO_SOURCE_URL.to_string(),
        image_url: placeholder.to_string(),
    }
}

pub fn article(title: &str, url: &str) -> Article {
    Article {
        title: title.to_string(),
        description: "description".to_string(),
        url: url.to_string(),
        image_url: None,
        published_at: "2025-05-02T10:00:00Z".to_string(),
        source: "Example News".to_string(),
    }
}
