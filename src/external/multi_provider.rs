use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::Quote;
use async_trait::async_trait;
use tracing::{info, warn};

/// Tries the primary provider first and falls back when it errors.
///
/// A clean "unknown symbol" answer from the primary is final; only transport,
/// parse and throttle failures move on to the fallback.
pub struct MultiProvider {
    primary: Box<dyn PriceProvider>,
    fallback: Box<dyn PriceProvider>,
}

impl MultiProvider {
    pub fn new(primary: Box<dyn PriceProvider>, fallback: Box<dyn PriceProvider>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl PriceProvider for MultiProvider {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, PriceProviderError> {
        match self.primary.lookup(symbol).await {
            Ok(found) => return Ok(found),
            Err(PriceProviderError::RateLimited) => {
                info!("Primary provider rate limited, trying fallback for {}", symbol);
            }
            Err(e) => {
                warn!("Primary provider error for {}: {}", symbol, e);
            }
        }

        self.fallback.lookup(symbol).await.map_err(|e| {
            warn!("Fallback provider failed for {}: {}", symbol, e);
            e
        })
    }
}
