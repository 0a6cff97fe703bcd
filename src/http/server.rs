//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, access key, metrics)
//! - Serve on a listener until shutdown is signalled

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::handlers;
use crate::http::request::{make_request_span, MakeRequestUuidV4};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::proxy::Gateway;
use crate::security::{access_key_middleware, AccessKeyState};
use crate::upstream::UpstreamClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new server from validated configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = UpstreamClient::new(&config.upstream, &config.timeouts)?;
        let state = AppState {
            gateway: Gateway::new(client),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let access = AccessKeyState::new(config.access.secret());

        Router::new()
            .route("/", get(handlers::home))
            .route("/proxy", get(handlers::proxy))
            .route("/_health", get(handlers::health))
            .with_state(state)
            .layer(middleware::from_fn_with_state(access, access_key_middleware))
            .layer(middleware::from_fn(track_metrics))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    )))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The fully layered router, for serving or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            access_key_required = self.config.access.secret().is_some(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait_for(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let route = match request.uri().path() {
        "/" => "home",
        "/proxy" => "proxy",
        "/_health" => "health",
        _ => "other",
    };
    let response = next.run(request).await;
    metrics::record_request(route, response.status().as_u16(), start);
    response
}
