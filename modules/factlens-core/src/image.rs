// Representative-image resolution for claims.
//
// Chain: scrape og/twitter metadata from the review page → static
// publisher-keyed logo → generic placeholder. The chain always terminates
// with some image; callers can rely on a non-empty result.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

use factlens_common::NO_SOURCE_URL;

use crate::traits::PageFetcher;
use crate::BROWSER_USER_AGENT;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const HEAD_LIMIT: usize = 50_000;

/// Static publisher → logo lookup, case-insensitive, with a mandatory
/// `default` entry so the resolver can never come up empty.
#[derive(Debug, Clone)]
pub struct PublisherImages {
    images: HashMap<String, String>,
}

impl PublisherImages {
    /// Build from an explicit mapping. The `default` key is required.
    pub fn new(entries: HashMap<String, String>) -> anyhow::Result<Self> {
        let images: HashMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        if !images.contains_key("default") {
            anyhow::bail!("publisher image table requires a 'default' entry");
        }
        Ok(Self { images })
    }

    /// The standard table, rooted at the static-asset origin.
    pub fn with_asset_base(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let mut entries = HashMap::new();
        entries.insert("usa today".to_string(), format!("{base}/images/usa-today-logo.png"));
        entries.insert("aap".to_string(), format!("{base}/images/aap-logo.png"));
        entries.insert("full fact".to_string(), format!("{base}/images/full-fact-logo.png"));
        entries.insert("default".to_string(), format!("{base}/images/placeholder.png"));
        Self::new(entries).expect("standard table has a default entry")
    }

    /// Logo for a publisher, or the placeholder when unrecognized.
    pub fn for_publisher(&self, publisher: &str) -> &str {
        self.images
            .get(&publisher.to_lowercase())
            .unwrap_or_else(|| &self.images["default"])
    }

    pub fn placeholder(&self) -> &str {
        &self.images["default"]
    }
}

/// Extract a page's representative image from open-graph / twitter-card /
/// image-meta conventions. Only the <head> section (or the first HEAD_LIMIT
/// bytes) is scanned.
pub fn extract_page_image(html: &str) -> Option<String> {
    let mut limit = html.len().min(HEAD_LIMIT);
    while !html.is_char_boundary(limit) {
        limit -= 1;
    }
    let head = if let Some(end) = html[..limit].find("</head>") {
        &html[..end]
    } else {
        &html[..limit]
    };

    let keys = ["og:image", "twitter:image", "image"];

    // property/name before content
    let fwd_re = Regex::new(
        r#"(?i)<meta\s+(?:[^>]*?\s)?(?:property|name|itemprop)\s*=\s*["']([\w:]+)["'][^>]*?\scontent\s*=\s*["']([^"']+)["'][^>]*/?\s*>"#,
    )
    .unwrap();

    // content before property/name
    let rev_re = Regex::new(
        r#"(?i)<meta\s+(?:[^>]*?\s)?content\s*=\s*["']([^"']+)["'][^>]*?\s(?:property|name|itemprop)\s*=\s*["']([\w:]+)["'][^>]*/?\s*>"#,
    )
    .unwrap();

    let mut found: HashMap<String, String> = HashMap::new();
    for cap in fwd_re.captures_iter(head) {
        let key = cap[1].to_lowercase();
        found.entry(key).or_insert_with(|| cap[2].to_string());
    }
    for cap in rev_re.captures_iter(head) {
        let key = cap[2].to_lowercase();
        found.entry(key).or_insert_with(|| cap[1].to_string());
    }

    keys.iter().find_map(|k| found.get(*k).cloned())
}

/// Rewrite an absolute third-party image URL into an internal proxy
/// reference, so the client never loads mixed-content images directly.
pub fn proxy_url(remote: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(remote.as_bytes()).collect();
    format!("/proxy-image?url={encoded}")
}

/// Default `PageFetcher`: plain GET with a desktop user agent and a bounded
/// timeout.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");
        Self { client }
    }
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn html(&self, url: &str) -> anyhow::Result<String> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("page fetch returned status {status}");
        }
        Ok(resp.text().await?)
    }
}

pub struct ImageResolver {
    fetcher: Arc<dyn PageFetcher>,
    publishers: PublisherImages,
}

impl ImageResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, publishers: PublisherImages) -> Self {
        Self {
            fetcher,
            publishers,
        }
    }

    /// Resolve a representative image for a claim. Infallible: scrape
    /// failures of any kind fall back to the static table.
    pub async fn resolve(&self, source_url: &str, publisher: &str) -> String {
        if source_url.is_empty() || source_url == NO_SOURCE_URL {
            return self.publishers.for_publisher(publisher).to_string();
        }

        match self.fetcher.html(source_url).await {
            Ok(html) => {
                if let Some(image) = extract_page_image(&html) {
                    debug!(url = source_url, image, "Scraped page image");
                    proxy_url(&image)
                } else {
                    debug!(url = source_url, "No image metadata on page, using publisher logo");
                    self.publishers.for_publisher(publisher).to_string()
                }
            }
            Err(e) => {
                warn!(url = source_url, error = %e, "Page fetch failed, using publisher logo");
                self.publishers.for_publisher(publisher).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_og_image() {
        let html = r#"<html><head>
            <meta property="og:title" content="A story" />
            <meta property="og:image" content="https://cdn.example.com/story.jpg" />
        </head><body></body></html>"#;
        assert_eq!(
            extract_page_image(html).as_deref(),
            Some("https://cdn.example.com/story.jpg")
        );
    }

    #[test]
    fn extracts_reversed_attribute_order() {
        let html = r#"<head><meta content="https://cdn.example.com/rev.jpg" property="og:image"></head>"#;
        assert_eq!(
            extract_page_image(html).as_deref(),
            Some("https://cdn.example.com/rev.jpg")
        );
    }

    #[test]
    fn falls_back_to_twitter_card() {
        let html = r#"<head><meta name="twitter:image" content="https://cdn.example.com/tw.jpg"></head>"#;
        assert_eq!(
            extract_page_image(html).as_deref(),
            Some("https://cdn.example.com/tw.jpg")
        );
    }

    #[test]
    fn og_image_preferred_over_twitter() {
        let html = r#"<head>
            <meta name="twitter:image" content="https://cdn.example.com/tw.jpg">
            <meta property="og:image" content="https://cdn.example.com/og.jpg">
        </head>"#;
        assert_eq!(
            extract_page_image(html).as_deref(),
            Some("https://cdn.example.com/og.jpg")
        );
    }

    #[test]
    fn no_image_metadata_returns_none() {
        let html = "<head><title>Nothing here</title></head><body><img src=\"x.jpg\"></body>";
        assert_eq!(extract_page_image(html), None);
    }

    #[test]
    fn ignores_metadata_after_head() {
        let html = r#"<head><title>x</title></head>
            <body><meta property="og:image" content="https://cdn.example.com/body.jpg"></body>"#;
        assert_eq!(extract_page_image(html), None);
    }

    #[test]
    fn proxy_url_encodes_query() {
        assert_eq!(
            proxy_url("https://cdn.example.com/a b.jpg?x=1&y=2"),
            "/proxy-image?url=https%3A%2F%2Fcdn.example.com%2Fa+b.jpg%3Fx%3D1%26y%3D2"
        );
    }

    #[test]
    fn publisher_lookup_is_case_insensitive() {
        let table = PublisherImages::with_asset_base("https://factlens.app");
        assert_eq!(
            table.for_publisher("USA Today"),
            "https://factlens.app/images/usa-today-logo.png"
        );
        assert_eq!(
            table.for_publisher("Full Fact"),
            "https://factlens.app/images/full-fact-logo.png"
        );
    }

    #[test]
    fn unknown_publisher_gets_placeholder() {
        let table = PublisherImages::with_asset_base("https://factlens.app");
        assert_eq!(
            table.for_publisher("Snopes"),
            "https://factlens.app/images/placeholder.png"
        );
    }

    #[test]
    fn table_without_default_is_rejected() {
        let mut entries = HashMap::new();
        entries.insert("aap".to_string(), "https://x/aap.png".to_string());
        assert!(PublisherImages::new(entries).is_err());
    }
}
