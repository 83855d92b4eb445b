use async_trait::async_trait;
use thiserror::Error;

use crate::models::Quote;

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Current quote for `symbol`, or `Ok(None)` when the provider does not
    /// know the symbol.
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, PriceProviderError>;
}

/// Trims and upper-cases a user-entered ticker. Blank input yields `None`.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}
