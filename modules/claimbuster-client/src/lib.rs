pub mod error;
pub mod types;

pub use error::{ClaimBusterError, Result};
pub use types::{ScoreTextInput, ScoreTextResponse, ScoredSentence};

use std::time::Duration;

const BASE_URL: &str = "https://idir.uta.edu/claimbuster/api/v1";

pub struct ClaimBusterClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ClaimBusterClient {
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

    /// Score free text for check-worthy claims. The API splits the input into
    /// sentences and scores each one.
    pub async fn score_text(&self, text: &str) -> Result<Vec<ScoredSentence>> {
        let url = format!("{}/score/text/", self.base_url);
        let input = ScoreTextInput {
            input_text: text.to_string(),
        };

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&input)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClaimBusterError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ScoreTextResponse = resp.json().await?;
        tracing::debug!(count = body.results.len(), "ClaimBuster scoring complete");
        Ok(body.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_score_response() {
        let raw = r#"{
            "results": [
                {"text": "The earth is flat.", "score": 0.83, "index": 0},
                {"text": "I like tea.", "score": 0.12, "index": 1}
            ]
        }"#;
        let parsed: ScoreTextResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert!(parsed.results[0].score > 0.8);
    }

    #[test]
    fn parses_response_without_results() {
        let parsed: ScoreTextResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }
}
