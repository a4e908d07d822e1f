//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, metrics, limits, timeout)
//! - Mount the admin API when enabled
//! - Bind server to listener and stop on shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    http::HeaderName,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::ServiceConfig;
use crate::http::offers::{apply_offer, register_offer};
use crate::http::request::{make_request_span, track_metrics, X_REQUEST_ID};
use crate::http::segment::get_segment;
use crate::offers::{OfferMatcher, OfferRegistry};
use crate::segment::{resolver, SegmentResolver, SegmentResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub matcher: Arc<OfferMatcher>,
    pub config: Arc<ServiceConfig>,
    pub started_at: Instant,
}

/// HTTP server for the cart offer service.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server using the segment resolver selected by configuration.
    pub fn new(config: ServiceConfig) -> SegmentResult<Self> {
        let resolver = resolver::from_config(&config.segment)?;
        Ok(Self::with_resolver(config, resolver))
    }

    /// Create a server with an explicit segment resolver.
    pub fn with_resolver(config: ServiceConfig, resolver: Arc<dyn SegmentResolver>) -> Self {
        let registry = Arc::new(OfferRegistry::new());
        let matcher = Arc::new(OfferMatcher::new(registry, resolver));

        let state = AppState {
            matcher,
            config: Arc::new(config),
            started_at: Instant::now(),
        };

        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        let mut router = Router::new()
            .route("/api/v1/offer", post(register_offer))
            .route("/api/v1/cart/apply_offer", post(apply_offer))
            .route("/api/v1/user_segment", get(get_segment))
            .route("/segment", get(get_segment))
            .route("/health", get(health));

        if config.admin.enabled {
            router = router.merge(setup_admin_router(state.clone()));
        }

        router
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }

    /// The fully layered router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve on `listener` until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            resolver = self.state.matcher.resolver_name(),
            admin = self.state.config.admin.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
