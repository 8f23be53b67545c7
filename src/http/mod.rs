use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

mod client;
pub mod cookie;

pub use client::HttpJsonClient;
pub use cookie::get_cookie;
pub use reqwest::Method;

/// Fetches a metrics endpoint and returns its parsed JSON body.
#[async_trait]
pub trait JsonClient: Send + Sync {
    async fn fetch_json(&self, url: &str, method: Method) -> Result<Value>;

    async fn get_json(&self, url: &str) -> Result<Value> {
        self.fetch_json(url, Method::GET).await
    }
}
