pub mod error;
pub mod types;

pub use error::{FactCheckToolsError, Result};
pub use types::{ClaimRecord, ClaimReview, ClaimSearchResponse, Publisher};

use std::time::Duration;

const BASE_URL: &str = "https://factchecktools.googleapis.com/v1alpha1";

pub struct FactCheckToolsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FactCheckToolsClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Search fact-checked claims by free text. Returns at most `page_size`
    /// records; an empty list when the provider matched nothing.
    pub async fn search_claims(&self, query: &str, page_size: u32) -> Result<Vec<ClaimRecord>> {
        let url = format!("{}/claims:search", self.base_url);
        let page_size = page_size.to_string();
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("query", query),
                ("key", &self.api_key),
                ("languageCode", "en"),
                ("pageSize", &page_size),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(FactCheckToolsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ClaimSearchResponse = resp.json().await?;
        tracing::debug!(query, count = body.claims.len(), "Fact Check Tools search complete");
        Ok(body.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_claims_response() {
        let raw = r#"{
            "claims": [{
                "text": "Vaccines cause autism",
                "claimant": "Viral post",
                "claimDate": "2020-03-01T00:00:00Z",
                "claimReview": [{
                    "publisher": {"name": "USA Today", "site": "usatoday.com"},
                    "url": "https://www.usatoday.com/story/fact-check",
                    "title": "Fact check: vaccines do not cause autism",
                    "textualRating": "False"
                }]
            }]
        }"#;
        let parsed: ClaimSearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.claims.len(), 1);
        let review = &parsed.claims[0].claim_review[0];
        assert_eq!(review.publisher.as_ref().unwrap().name.as_deref(), Some("USA Today"));
        assert_eq!(review.textual_rating.as_deref(), Some("False"));
    }

    #[test]
    fn parses_empty_response() {
        let parsed: ClaimSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.claims.is_empty());
    }
}
