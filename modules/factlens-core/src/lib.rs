pub mod aggregator;
pub mod image;
pub mod proxy;
pub mod rate_limit;
pub mod sources;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use aggregator::{AggregateResponse, Aggregator};
pub use image::{ImageResolver, PublisherImages};
pub use proxy::ImageProxy;
pub use rate_limit::{Clock, RateDecision, RateLimiter, SystemClock};
pub use traits::{ClaimSource, NewsSource, PageFetcher, SourceError};

/// Desktop-browser user agent sent to scraped pages and image hosts.
/// Some publishers reject requests with default library user agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
