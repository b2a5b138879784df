use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::handlers::{self, AppState};

/// Form posts are a handful of short text fields.
const MAX_FORM_BYTES: usize = 64 * 1024;

/// Per-IP rate limit applied to the submission route.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    /// One request of quota is regained every `replenish_ms` milliseconds.
    pub replenish_ms: u64,
    /// Requests allowed back to back before throttling.
    pub burst: u32,
}

/// Build the application router.
///
/// `rate_limit` is optional so tests can drive the router without a peer
/// address; the server always passes one.
pub fn build_router(
    state: Arc<AppState>,
    rate_limit: Option<RateLimit>,
) -> anyhow::Result<Router> {
    let mut submission_routes = Router::new()
        .route("/simulacao", post(handlers::submit_simulation))
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES));

    if let Some(limit) = rate_limit {
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_millisecond(limit.replenish_ms)
                .burst_size(limit.burst)
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .ok_or_else(|| anyhow::anyhow!("invalid rate limit configuration"))?,
        );
        submission_routes = submission_routes.layer(GovernorLayer {
            config: governor_conf,
        });
    }

    // Health check bypasses rate limiting
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(submission_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(handlers::handle_panic))
                .layer(middleware::map_response(handlers::json_rejections)),
        );

    Ok(app)
}
