use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    /// Cents.
    pub price: i64,
}

#[derive(Debug, Deserialize)]
pub struct QuoteForm {
    pub symbol: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuoteView {
    pub symbol: String,
    pub name: String,
    pub price: i64,
    pub display: String,
}
