// file: src/models/item.rs
// description: browse api search response model
// reference: https://developer.ebay.com/api-docs/buy/browse/resources/item_summary/methods/search

use serde::{Deserialize, Serialize};

/// One page of `item_summary/search` results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    /// Absent when the offset is past the last result.
    #[serde(default)]
    pub item_summaries: Vec<ItemSummary>,

    /// Total number of matches reported by the API
    pub total: Option<u64>,
}

impl SearchPage {
    pub fn is_empty(&self) -> bool {
        self.item_summaries.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub item_id: Option<String>,
    pub title: Option<String>,
    pub price: Option<Price>,
    pub condition: Option<String>,
    pub seller: Option<Seller>,
    pub image: Option<Image>,
    pub item_web_url: Option<String>,
    pub item_creation_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Price {
    pub value: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub username: Option<String>,
    pub feedback_score: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub image_url: Option<String>,
}
