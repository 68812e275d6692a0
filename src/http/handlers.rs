//! Axum HTTP handlers for the web server
//!
//! Provides the Model Context Protocol endpoint and the public metadata endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::AppState;

pub const ROOT_BANNER: &str = "hey there 👋 this is store-mcp-server";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OAuthMetadataResponse {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub jwks_uri: String,
    pub response_types_supported: Vec<&'static str>,
    pub grant_types_supported: Vec<&'static str>,
    pub scopes_supported: Vec<String>,
}

pub async fn root() -> &'static str {
    ROOT_BANNER
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn oauth_metadata(State(state): State<AppState>) -> Json<OAuthMetadataResponse> {
    let oauth = &state.oauth;
    Json(OAuthMetadataResponse {
        issuer: oauth.issuer.clone(),
        authorization_endpoint: oauth.authorization_endpoint.clone(),
        token_endpoint: oauth.token_endpoint.clone(),
        jwks_uri: oauth.jwks_uri.clone(),
        response_types_supported: vec!["code"],
        grant_types_supported: vec!["authorization_code"],
        scopes_supported: oauth.scopes.clone(),
    })
}

pub async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    match state.dispatcher.handle(&body) {
        Some(encoded) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            encoded,
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
