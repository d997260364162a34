use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::{error, warn};

use factlens_common::{validate_external_url, FactLensError};

use crate::AppState;

/// Served when a proxied image cannot be fetched.
const PLACEHOLDER_PNG: &[u8] = include_bytes!("../../assets/placeholder.png");

// --- Request structs ---

/// `query` is optional at the deserialization layer so a body that omits it
/// still reaches the handler and gets the 400 `{ "message": ... }` shape
/// instead of the extractor's 422 rejection.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub include_news: bool,
}

#[derive(Deserialize)]
pub struct ProxyImageQuery {
    pub url: Option<String>,
}

// --- Error mapping ---

fn status_for(err: &FactLensError) -> StatusCode {
    match err {
        FactLensError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        FactLensError::UpstreamRateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        FactLensError::UpstreamUnauthorized { .. } => StatusCode::FORBIDDEN,
        FactLensError::NoResults => StatusCode::NOT_FOUND,
        FactLensError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        FactLensError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: FactLensError) -> Response {
    let status = status_for(&err);
    let message = match &err {
        // Detail stays in server-side logs only.
        FactLensError::Internal(detail) => {
            error!(error = %detail, "Unhandled failure in fact-check pipeline");
            "An unexpected error occurred. Please try again later.".to_string()
        }
        other => other.to_string(),
    };
    let mut response = (status, Json(serde_json::json!({ "message": message }))).into_response();
    if let FactLensError::RateLimited { retry_after_secs } = &err {
        if let Ok(value) = retry_after_secs.to_string().parse() {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
    }
    response
}

// --- Handlers ---

pub async fn fact_check(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<std::net::SocketAddr>,
    Json(body): Json<FactCheckRequest>,
) -> Response {
    let query = body.query.as_deref().unwrap_or("");
    match state
        .aggregator
        .fact_check(addr.ip(), query, body.include_news)
        .await
    {
        Ok(results) => Json(results).into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn proxy_image(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProxyImageQuery>,
) -> Response {
    let Some(url) = params.url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"message": "Image URL is required"})),
        )
            .into_response();
    };

    let parsed = match validate_external_url(&url) {
        Ok(u) => u,
        Err(msg) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"message": msg})),
            )
                .into_response();
        }
    };

    match state.proxy.fetch_and_cache(parsed.as_str()).await {
        Ok((bytes, content_type)) => image_response(&content_type, bytes),
        Err(e) => {
            warn!(url, error = %e, "Image proxy fetch failed, serving placeholder");
            image_response("image/png", PLACEHOLDER_PNG)
        }
    }
}

/// Proxied images are per-user fetches; keep intermediaries from caching
/// them. Other endpoints are left to the default caching rules.
fn image_response<B: IntoResponse>(content_type: &str, body: B) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::SocketAddr;
    use std::time::Duration;

    use factlens_core::testing::{MockClaimSource, MockNewsSource, MockPageFetcher, TEST_ASSET_BASE};
    use factlens_core::{Aggregator, ImageProxy, ImageResolver, PublisherImages, RateLimiter};

    fn state() -> Arc<AppState> {
        let resolver = ImageResolver::new(
            Arc::new(MockPageFetcher::new()),
            PublisherImages::with_asset_base(TEST_ASSET_BASE),
        );
        let aggregator = Aggregator::new(
            Arc::new(MockClaimSource::empty("Google Fact Check")),
            Arc::new(MockClaimSource::empty("ClaimBuster")),
            Arc::new(MockNewsSource::empty("GNews")),
            resolver,
            RateLimiter::new(15, Duration::from_secs(3600)),
        );
        Arc::new(AppState {
            aggregator,
            proxy: ImageProxy::new(),
        })
    }

    fn addr() -> SocketAddr {
        "203.0.113.7:49152".parse().unwrap()
    }

    #[test]
    fn include_news_defaults_to_false() {
        let body: FactCheckRequest = serde_json::from_str(r#"{"query": "x"}"#).unwrap();
        assert!(!body.include_news);
        let body: FactCheckRequest =
            serde_json::from_str(r#"{"query": "x", "includeNews": true}"#).unwrap();
        assert!(body.include_news);
    }

    #[test]
    fn body_without_query_still_deserializes() {
        let body: FactCheckRequest = serde_json::from_str("{}").unwrap();
        assert!(body.query.is_none());
        let body: FactCheckRequest = serde_json::from_str(r#"{"includeNews": true}"#).unwrap();
        assert!(body.query.is_none());
        assert!(body.include_news);
    }

    #[tokio::test]
    async fn missing_query_yields_400_json() {
        let body: FactCheckRequest = serde_json::from_str("{}").unwrap();
        let response = fact_check(State(state()), ConnectInfo(addr()), Json(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn blank_query_yields_400_json() {
        let body: FactCheckRequest = serde_json::from_str(r#"{"query": "   "}"#).unwrap();
        let response = fact_check(State(state()), ConnectInfo(addr()), Json(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn image_response_disables_caching() {
        let response = image_response("image/png", PLACEHOLDER_PNG);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
        assert_eq!(response.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
    }

    #[test]
    fn error_statuses_match_taxonomy() {
        assert_eq!(
            status_for(&FactLensError::InvalidQuery("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&FactLensError::UpstreamRateLimited {
                provider: "Google Fact Check".into()
            }),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_for(&FactLensError::UpstreamUnauthorized {
                provider: "Google Fact Check".into()
            }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_for(&FactLensError::NoResults), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&FactLensError::RateLimited { retry_after_secs: 60 }),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_for(&FactLensError::Internal(anyhow::anyhow!("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn rate_limited_response_carries_retry_after() {
        let response = error_response(FactLensError::RateLimited { retry_after_secs: 120 });
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "120"
        );
    }

    #[test]
    fn internal_error_message_is_generic() {
        let response = error_response(FactLensError::Internal(anyhow::anyhow!(
            "secret connection string leaked"
        )));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn placeholder_asset_is_a_png() {
        assert_eq!(&PLACEHOLDER_PNG[..8], b"\x89PNG\r\n\x1a\n");
    }
}
