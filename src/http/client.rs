use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Instant;
use url::Url;

use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::http::cookie::get_cookie;
use crate::http::JsonClient;
use crate::logging::log_fetch;

const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// reqwest-backed client that behaves like a same-origin browser fetch:
/// session cookies and the CSRF token only travel to the dashboard's origin.
pub struct HttpJsonClient {
    client: Client,
    base: Url,
    cookies: Option<String>,
}

impl HttpJsonClient {
    pub fn new(base: Url, cookies: Option<String>, timeout: Option<std::time::Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout.filter(|t| !t.is_zero()) {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| DashboardError::Transport {
            url: base.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { client, base, cookies })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(cfg.base_url.clone(), cfg.cookies.clone(), cfg.request_timeout)
    }

    /// Resolve `url` against the base, the way a page resolves a relative href.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        self.base.join(url).map_err(|source| DashboardError::InvalidUrl {
            url: url.to_string(),
            source,
        })
    }

    fn is_same_origin(&self, target: &Url) -> bool {
        target.origin() == self.base.origin()
    }

    pub fn csrf_token(&self) -> Option<String> {
        self.cookies.as_deref().and_then(|c| get_cookie(c, CSRF_COOKIE))
    }
}

#[async_trait]
impl JsonClient for HttpJsonClient {
    async fn fetch_json(&self, url: &str, method: Method) -> Result<Value> {
        let target = self.resolve(url)?;
        let target_str = target.to_string();

        let mut req = self
            .client
            .request(method.clone(), target.clone())
            .header(ACCEPT, "application/json")
            .header("X-Requested-With", "XMLHttpRequest");
        if self.is_same_origin(&target) {
            if let Some(cookies) = &self.cookies {
                req = req.header(COOKIE, cookies.as_str());
            }
            if let Some(token) = self.csrf_token() {
                req = req.header(CSRF_HEADER, token);
            }
        }

        let started = Instant::now();
        let transport = |e: reqwest::Error| DashboardError::Transport {
            url: target_str.clone(),
            reason: e.to_string(),
        };
        let resp = req.send().await.map_err(transport)?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(transport)?;
        log_fetch(
            &target_str,
            method.as_str(),
            status.as_u16(),
            started.elapsed().as_millis() as u64,
        );

        if !status.is_success() {
            return Err(DashboardError::Status {
                url: target_str,
                status: status.as_u16(),
            });
        }
        serde_json::from_slice(&body).map_err(|source| DashboardError::Decode {
            url: target_str,
            source,
        })
    }
}
