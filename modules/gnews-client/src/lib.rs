pub mod error;
pub mod types;

pub use error::{GNewsError, Result};
pub use types::{ArticleRecord, ArticleSource, SearchResponse};

use std::time::Duration;

const BASE_URL: &str = "https://gnews.io/api/v4";

pub struct GNewsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GNewsClient {
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

    /// Search recent English-language US articles matching a query.
    pub async fn search(&self, query: &str, max: u32) -> Result<Vec<ArticleRecord>> {
        let url = format!("{}/search", self.base_url);
        let max = max.to_string();
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("lang", "en"),
                ("country", "us"),
                ("max", &max),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GNewsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = resp.json().await?;
        tracing::debug!(query, count = body.articles.len(), "GNews search complete");
        Ok(body.articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_articles_response() {
        let raw = r#"{
            "totalArticles": 1,
            "articles": [{
                "title": "Measles outbreak grows",
                "description": "Cases rise across three states.",
                "url": "https://example.com/measles",
                "image": "https://example.com/measles.jpg",
                "publishedAt": "2025-05-02T10:00:00Z",
                "source": {"name": "Example News", "url": "https://example.com"}
            }]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.articles.len(), 1);
        assert_eq!(
            parsed.articles[0].source.as_ref().unwrap().name.as_deref(),
            Some("Example News")
        );
    }
}
