use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;

use config::OAuthConfig;
use mcp::server::Dispatcher;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub oauth: Arc<OAuthConfig>,
}

impl AppState {
    pub fn new(oauth: OAuthConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            oauth: Arc::new(oauth),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::root))
        .route("/health", get(http::handlers::health))
        .route(
            "/.well-known/oauth-authorization-server",
            get(http::handlers::oauth_metadata),
        )
        .route("/mcp", post(http::handlers::mcp_endpoint))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
