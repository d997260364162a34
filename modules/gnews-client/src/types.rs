use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub articles: Vec<ArticleRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub source: Option<ArticleSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleSource {
    pub name: Option<String>,
    pub url: Option<String>,
}
