// Image proxy: re-serves remote images through the service's own origin so
// clients never load third-party image hosts directly. Process-local cache,
// TTL plus opportunistic size-based eviction — not a CDN.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::debug;

use crate::BROWSER_USER_AGENT;

const CACHE_TTL: Duration = Duration::from_secs(3600);
const MAX_CACHE_ENTRIES: usize = 500;
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
struct CacheEntry {
    bytes: Bytes,
    content_type: String,
    inserted_at: Instant,
}

pub struct ImageProxy {
    entries: RwLock<HashMap<String, CacheEntry>>,
    client: reqwest::Client,
}

impl ImageProxy {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            entries: RwLock::new(HashMap::new()),
            client,
        }
    }

    async fn get(&self, url: &str) -> Option<(Bytes, String)> {
        let entries = self.entries.read().await;
        let entry = entries.get(url)?;
        if entry.inserted_at.elapsed() < CACHE_TTL {
            Some((entry.bytes.clone(), entry.content_type.clone()))
        } else {
            None
        }
    }

    async fn insert(&self, url: String, bytes: Bytes, content_type: String) {
        let mut entries = self.entries.write().await;
        // Opportunistic TTL sweep when we hit the limit; if everything is
        // still fresh, drop the oldest entry instead.
        if entries.len() >= MAX_CACHE_ENTRIES {
            let now = Instant::now();
            entries.retain(|_, v| now.duration_since(v.inserted_at) < CACHE_TTL);
            if entries.len() >= MAX_CACHE_ENTRIES {
                if let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, v)| v.inserted_at)
                    .map(|(k, _)| k.clone())
                {
                    entries.remove(&oldest);
                }
            }
        }
        entries.insert(
            url,
            CacheEntry {
                bytes,
                content_type,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Fetch an image, serving from cache when fresh. Returns the raw bytes
    /// and the upstream content type.
    pub async fn fetch_and_cache(&self, url: &str) -> anyhow::Result<(Bytes, String)> {
        if let Some(hit) = self.get(url).await {
            debug!(url, "Image cache hit");
            return Ok(hit);
        }

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("image fetch returned status {status}");
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let bytes = resp.bytes().await?;

        self.insert(url.to_string(), bytes.clone(), content_type.clone())
            .await;
        Ok((bytes, content_type))
    }
}

impl Default for ImageProxy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cache_roundtrip() {
        let proxy = ImageProxy::new();
        proxy
            .insert(
                "https://cdn.example.com/a.png".to_string(),
                Bytes::from_static(b"\x89PNG"),
                "image/png".to_string(),
            )
            .await;
        let (bytes, content_type) = proxy.get("https://cdn.example.com/a.png").await.unwrap();
        assert_eq!(&bytes[..], b"\x89PNG");
        assert_eq!(content_type, "image/png");
    }

    #[tokio::test]
    async fn miss_for_unknown_url() {
        let proxy = ImageProxy::new();
        assert!(proxy.get("https://cdn.example.com/missing.png").await.is_none());
    }

    #[tokio::test]
    async fn eviction_keeps_map_bounded() {
        let proxy = ImageProxy::new();
        for i in 0..(MAX_CACHE_ENTRIES + 10) {
            proxy
                .insert(
                    format!("https://cdn.example.com/{i}.png"),
                    Bytes::from_static(b"x"),
                    "image/png".to_string(),
                )
                .await;
        }
        let entries = proxy.entries.read().await;
        assert!(entries.len() <= MAX_CACHE_ENTRIES);
    }
}
