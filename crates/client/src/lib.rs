//! Thin HTTP client mirroring the carhub resource operations; the
//! programmatic counterpart of a browser-side service layer. Every method is
//! one request against the REST surface, results returned as raw JSON.

pub mod auth;
pub mod cars;
pub mod reviews;
pub mod users;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("api error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// Cookie-keeping HTTP client for the carhub API. Login state lives in the
/// cookie store, exactly as it does in a browser.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self { http, base_url: normalize_base(base_url.into()) })
    }

    pub fn cars(&self) -> cars::CarsClient<'_> {
        cars::CarsClient { api: self }
    }

    pub fn users(&self) -> users::UsersClient<'_> {
        users::UsersClient { api: self }
    }

    pub fn reviews(&self) -> reviews::ReviewsClient<'_> {
        reviews::ReviewsClient { api: self }
    }

    pub fn auth(&self) -> auth::AuthClient<'_> {
        auth::AuthClient { api: self }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    pub(crate) async fn parse(resp: reqwest::Response) -> Result<serde_json::Value, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status: status.as_u16(), body });
        }
        resp.json().await.map_err(|e| ClientError::Parse(e.to_string()))
    }
}

fn normalize_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}
