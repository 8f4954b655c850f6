// file: src/api/mod.rs
// description: remote endpoints used by both pipelines and the traits they sit behind
// reference: internal module structure

pub mod auth;
pub mod images;
pub mod search;

#[cfg(test)]
pub(crate) mod test_server;

pub use auth::{AccessToken, TokenClient};
pub use images::HttpImageSource;
pub use search::EbayClient;

use crate::error::{FetchError, HarvestError, Result};
use crate::models::SearchPage;
use std::future::Future;
use std::time::Duration;

/// A paged listing search.
pub trait SearchApi: Send + Sync {
    fn search(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> impl Future<Output = std::result::Result<SearchPage, FetchError>> + Send;
}

/// Raw response to an image request. Status handling is left to the caller.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

pub trait ImageSource: Send + Sync {
    fn fetch(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<FetchedImage, FetchError>> + Send;
}

pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(HarvestError::Http)
}
