use std::{env, net::SocketAddr};

use thiserror::Error;

const DEFAULT_SCOPES: &str = "openid profile email";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub oauth: OAuthConfig,
}

/// Values published verbatim by the OAuth discovery endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthConfig {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub jwks_uri: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string());
        let bind_port = var("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);

        let oauth = OAuthConfig {
            issuer: var("OAUTH_ISSUER").unwrap_or_default(),
            authorization_endpoint: var("OAUTH_AUTHORIZATION_ENDPOINT").unwrap_or_default(),
            token_endpoint: var("OAUTH_TOKEN_ENDPOINT").unwrap_or_default(),
            jwks_uri: var("OAUTH_JWKS_URI").unwrap_or_default(),
            scopes: var("OAUTH_SCOPES")
                .as_deref()
                .unwrap_or(DEFAULT_SCOPES)
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        };

        let config = Self {
            bind_addr,
            bind_port,
            oauth,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}
