//! Adds CORS headers to every issuer response

use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue,
    },
    Router,
};
use media_storage::ConfigError;
use tower_http::set_header::SetResponseHeaderLayer;

const ALLOW_METHODS: &str = "OPTIONS,POST,GET";
const ALLOW_HEADERS: &str = "Content-Type";
const ALLOW_CREDENTIALS: &str = "true";

/// Origin allowed to call the issuer from a browser
#[derive(Debug, Clone)]
pub struct CorsConfig {
    allow_origin: HeaderValue,
}

impl CorsConfig {
    /// Validates `app_url` as a header value
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `app_url` contains bytes not allowed in a header
    pub fn new(app_url: &str) -> Result<Self, ConfigError> {
        let allow_origin = HeaderValue::from_str(app_url)
            .map_err(|e| ConfigError::invalid("APP_URL", app_url, e.to_string()))?;

        Ok(Self { allow_origin })
    }

    /// Value sent in `Access-Control-Allow-Origin`
    #[must_use]
    pub const fn allow_origin(&self) -> &HeaderValue {
        &self.allow_origin
    }

    /// Wraps `router` so every response, errors included, carries the CORS headers
    #[must_use]
    pub fn decorate(&self, router: Router) -> Router {
        router
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                self.allow_origin.clone(),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static(ALLOW_CREDENTIALS),
            ))
    }
}
