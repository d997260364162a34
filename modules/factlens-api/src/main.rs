use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use claimbuster_client::ClaimBusterClient;
use factchecktools_client::FactCheckToolsClient;
use factlens_common::Config;
use factlens_core::image::HttpPageFetcher;
use factlens_core::sources::{ClaimBusterSource, FactCheckToolsSource, GNewsSource};
use factlens_core::{Aggregator, ImageProxy, ImageResolver, PublisherImages, RateLimiter};
use gnews_client::GNewsClient;

mod rest;

pub struct AppState {
    pub aggregator: Aggregator,
    pub proxy: ImageProxy,
}

/// Default log directives applied when `RUST_LOG` does not override them.
/// One per workspace crate; a bare `factlens` prefix would match none of them.
const LOG_DIRECTIVES: [&str; 3] = [
    "factlens_api=info",
    "factlens_core=info",
    "factlens_common=info",
];

#[tokio::main]
async fn main() -> Result<()> {
    let mut filter = EnvFilter::from_default_env();
    for directive in LOG_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env();

    let publishers = PublisherImages::with_asset_base(&config.asset_base_url);
    let placeholder = publishers.placeholder().to_string();

    let primary = Arc::new(FactCheckToolsSource::new(FactCheckToolsClient::new(
        config.google_api_key.clone(),
    )));
    let fallback = Arc::new(ClaimBusterSource::new(
        ClaimBusterClient::new(config.claimbuster_api_key.clone()),
        placeholder,
    ));
    let news = Arc::new(GNewsSource::new(GNewsClient::new(
        config.gnews_api_key.clone(),
    )));

    let resolver = ImageResolver::new(Arc::new(HttpPageFetcher::new()), publishers);
    let limiter = RateLimiter::new(
        config.rate_limit_max,
        std::time::Duration::from_secs(config.rate_limit_window_secs),
    );

    let state = Arc::new(AppState {
        aggregator: Aggregator::new(primary, fallback, news, resolver, limiter),
        proxy: ImageProxy::new(),
    });

    let app = Router::new()
        // Health check
        .route("/health", get(|| async { Json(serde_json::json!({"status": "OK"})) }))
        // Core aggregation endpoint
        .route("/api/fact-check", post(rest::fact_check))
        // Image proxy side channel
        .route("/proxy-image", get(rest::proxy_image))
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"message": "Endpoint not found"})),
            )
        })
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path + status + latency only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.host, config.port);
    info!("factlens API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::LOG_DIRECTIVES;

    #[test]
    fn default_log_directives_parse_and_name_real_crates() {
        let crates = ["factlens_api", "factlens_core", "factlens_common"];
        for (directive, krate) in LOG_DIRECTIVES.iter().zip(crates) {
            directive
                .parse::<tracing_subscriber::filter::Directive>()
                .unwrap();
            assert!(directive.starts_with(krate));
        }
    }
}
