// file: src/models/row.rs
// description: flat listing row written to the collected table
// reference: internal data structures

use crate::models::item::ItemSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub query: String,
    pub item_id: String,
    pub title: String,
    pub price: String,
    pub currency: String,
    pub condition: String,
    pub seller: String,
    pub feedback_score: Option<u64>,
    pub image_url: String,
    pub item_url: String,
    pub item_creation_date: String,
}

impl Row {
    /// Column order of the collected table.
    pub const HEADERS: [&'static str; 11] = [
        "query",
        "item_id",
        "title",
        "price",
        "currency",
        "condition",
        "seller",
        "feedback_score",
        "image_url",
        "item_url",
        "item_creation_date",
    ];

    pub fn from_item(query: &str, item: ItemSummary) -> Self {
        let (price, currency) = item
            .price
            .map(|p| (p.value.unwrap_or_default(), p.currency.unwrap_or_default()))
            .unwrap_or_default();
        let (seller, feedback_score) = item
            .seller
            .map(|s| (s.username.unwrap_or_default(), s.feedback_score))
            .unwrap_or_default();

        Self {
            query: query.to_string(),
            item_id: item.item_id.unwrap_or_default(),
            title: item.title.unwrap_or_default(),
            price,
            currency,
            condition: item.condition.unwrap_or_default(),
            seller,
            feedback_score,
            image_url: item
                .image
                .and_then(|i| i.image_url)
                .unwrap_or_default(),
            item_url: item.item_web_url.unwrap_or_default(),
            item_creation_date: item.item_creation_date.unwrap_or_default(),
        }
    }
}
