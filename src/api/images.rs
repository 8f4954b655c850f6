// file: src/api/images.rs
// description: plain http image fetching for the downloader
// reference: https://docs.rs/reqwest

use crate::api::{FetchedImage, ImageSource};
use crate::error::FetchError;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

pub struct HttpImageSource {
    client: Client,
}

impl HttpImageSource {
    /// `client` should carry the per-request timeout.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(FetchedImage {
            status,
            content_type,
            body,
        })
    }
}
