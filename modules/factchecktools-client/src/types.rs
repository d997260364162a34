use serde::Deserialize;

/// Top-level response of `claims:search`. `claims` is absent entirely when
/// nothing matched.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimSearchResponse {
    #[serde(default)]
    pub claims: Vec<ClaimRecord>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimRecord {
    pub text: Option<String>,
    pub claimant: Option<String>,
    #[serde(rename = "claimDate")]
    pub claim_date: Option<String>,
    #[serde(rename = "claimReview", default)]
    pub claim_review: Vec<ClaimReview>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimReview {
    pub publisher: Option<Publisher>,
    pub url: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "reviewDate")]
    pub review_date: Option<String>,
    #[serde(rename = "textualRating")]
    pub textual_rating: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Publisher {
    pub name: Option<String>,
    pub site: Option<String>,
}
