use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel for a heuristic that found no qualifying match. Every scalar
/// field is either a non-empty extracted value or exactly this, never empty,
/// never absent.
pub const NOT_FOUND: &str = "N/A";

/// Product category stamped on every record. Single-vertical for now.
pub const PRODUCT_TYPE: &str = "Foundation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StockStatus {
    #[default]
    #[serde(rename = "In stock")]
    InStock,
    #[serde(rename = "Out of stock")]
    OutOfStock,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::InStock => write!(f, "In stock"),
            StockStatus::OutOfStock => write!(f, "Out of stock"),
        }
    }
}

/// One customer review fragment, extracted transiently from a review
/// container. Preserved structured on the record in addition to the flattened
/// summary column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub star_rating: String,
    pub review_text: String,
    pub review_date: String,
    pub reviewer: String,
    pub verified_purchase: bool,
    pub helpful_votes: String,
}

/// Weakly-correlated popularity signals derived from full-page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSignals {
    pub number_of_reviews: String,
    pub bestseller: bool,
    pub stock_status: StockStatus,
}

/// The unit of output: one scraped product page, flattened into a tabular
/// row by the store. Field order is column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub url: String,
    pub name: String,
    pub price: String,
    #[serde(rename = "type")]
    pub product_type: String,
    /// Deduplicated, never empty: holds the sentinel when nothing was found.
    pub shades: Vec<String>,
    pub image: String,
    pub ingredients: String,
    pub number_of_reviews: String,
    pub bestseller: bool,
    pub stock_status: StockStatus,
    pub reviews: Vec<ReviewRecord>,
    /// Pipe-flattened rendering of `reviews` for the tabular channel.
    pub reviews_summary: String,
    pub scraped_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub user_agents: Vec<String>,
    pub timeout_ms: u64,
    /// Pause after each fetch so late-rendering content (or the next origin
    /// request) has time to settle. Fixed delay is the minimum policy; a
    /// rendering fetcher may wait adaptively instead.
    pub settle_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15".into(),
                "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0".into(),
            ],
            timeout_ms: 30_000,
            settle_ms: 5_000,
        }
    }
}

/// Handy wrapper when you want to print or pass results as a single object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}
impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_status_display_matches_serde_rename() {
        assert_eq!(StockStatus::InStock.to_string(), "In stock");
        assert_eq!(StockStatus::OutOfStock.to_string(), "Out of stock");
        let json = serde_json::to_string(&StockStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"Out of stock\"");
    }

    #[test]
    fn product_type_serializes_as_type() {
        let rec = ProductRecord {
            url: "https://example.com/p".into(),
            name: NOT_FOUND.into(),
            price: NOT_FOUND.into(),
            product_type: PRODUCT_TYPE.into(),
            shades: vec![NOT_FOUND.into()],
            image: NOT_FOUND.into(),
            ingredients: NOT_FOUND.into(),
            number_of_reviews: NOT_FOUND.into(),
            bestseller: false,
            stock_status: StockStatus::InStock,
            reviews: vec![],
            reviews_summary: NOT_FOUND.into(),
            scraped_at: Utc::now(),
        };
        let v: serde_json::Value = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["type"], "Foundation");
        assert!(v.get("product_type").is_none());
    }
}
