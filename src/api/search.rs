// file: src/api/search.rs
// description: browse api item search client
// reference: https://developer.ebay.com/api-docs/buy/browse/resources/item_summary/methods/search

use crate::api::{AccessToken, SearchApi};
use crate::error::FetchError;
use crate::models::SearchPage;
use reqwest::Client;
use tracing::debug;

pub struct EbayClient {
    client: Client,
    search_url: String,
    token: AccessToken,
    marketplace_id: Option<String>,
}

impl EbayClient {
    pub fn new(client: Client, search_url: String, token: AccessToken) -> Self {
        Self {
            client,
            search_url,
            token,
            marketplace_id: None,
        }
    }

    pub fn with_marketplace(mut self, marketplace_id: Option<String>) -> Self {
        self.marketplace_id = marketplace_id;
        self
    }
}

impl SearchApi for EbayClient {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<SearchPage, FetchError> {
        debug!(query, limit, offset, "Requesting search page");

        let mut request = self
            .client
            .get(&self.search_url)
            .bearer_auth(self.token.secret())
            .query(&[
                ("q", query.to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ]);

        if let Some(marketplace_id) = &self.marketplace_id {
            request = request.header("X-EBAY-C-MARKETPLACE-ID", marketplace_id);
        }

        let response = request.send().await?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(FetchError::Status(status));
        }

        response
            .json::<SearchPage>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}
