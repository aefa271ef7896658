//! HTTP client for the hosted backend
//!
//! The backend exposes a REST table API under `/rest/v1` and an auth API
//! under `/auth/v1`. Every request carries the project API key; table
//! requests additionally carry the signed-in user's bearer token.

use crate::config;
use crate::error::{AppError, Result};
use reqwest::{Client, Method, RequestBuilder};

/// Shared client for table and auth requests
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("tasktracker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AppError::Config("Backend URL is empty".to_string()));
        }

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request against a REST table, authorized as the given user token
    pub fn table(&self, method: Method, table: &str, access_token: &str) -> RequestBuilder {
        let url = format!("{}{}/{}", self.base_url, config::REST_PATH, table);
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
    }

    /// Request against the auth API. Without a user token the API key is
    /// used as bearer, which is what anonymous auth calls expect.
    pub fn auth(&self, method: Method, path: &str, access_token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}/{}", self.base_url, config::AUTH_PATH, path);
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token.unwrap_or(&self.api_key))
    }
}

/// Pull a readable message out of a failed backend response
pub(crate) async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or(body);

    if detail.is_empty() {
        format!("backend returned {}", status)
    } else {
        format!("backend returned {}: {}", status, detail)
    }
}
