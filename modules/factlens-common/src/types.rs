use serde::{Deserialize, Serialize};

/// Sentinel used when a claim has no review URL to link to.
pub const NO_SOURCE_URL: &str = "#";

/// Default for optional provider fields that are absent.
pub const UNKNOWN: &str = "Unknown";

// --- Claims ---

/// A normalized fact-checked claim, as returned to the client.
///
/// Produced only by source adapters; `image_url` is filled in afterwards by
/// the image resolver (adapters leave it empty, except the fallback adapter
/// which has no article to scrape and sets the placeholder directly).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub claim_text: String,
    pub claimant: String,
    /// ISO date string, or "Unknown".
    pub date: String,
    pub publisher: String,
    pub rating: String,
    /// Review URL, or "#" when the provider gave none.
    pub source_url: String,
    pub image_url: String,
}

impl Claim {
    /// True when there is no real article behind this claim.
    pub fn has_source_url(&self) -> bool {
        !self.source_url.is_empty() && self.source_url != NO_SOURCE_URL
    }
}

// --- News articles ---

/// A normalized news article from the news sidebar source.
/// Independent lifecycle from claims: can be empty while claims are not,
/// and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: String,
    pub source: String,
}

/// User input after trimming and whitespace-collapsing, used uniformly
/// across all adapters. `None` if the input was blank.
pub fn normalize_query(raw: &str) -> Option<String> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
