use crate::external::price_provider::{normalize_symbol, PriceProvider, PriceProviderError};
use crate::models::Quote;
use crate::money::to_cents;
use async_trait::async_trait;
use serde::Deserialize;

pub struct AlphaVantageProvider {
    client: reqwest::Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AvQuoteResponse {
    // Unknown symbols come back as an empty object: { "Global Quote": {} }
    #[serde(rename = "Global Quote")]
    global_quote: Option<AvGlobalQuote>,

    // When rate-limited Alpha Vantage returns:
    // { "Note": "Thank you for using Alpha Vantage! ... 5 calls per minute ..." }
    #[serde(rename = "Note")]
    note: Option<String>,

    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AvGlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
}

impl AvQuoteResponse {
    fn into_quote(self) -> Result<Option<Quote>, PriceProviderError> {
        if self.note.is_some() {
            return Err(PriceProviderError::RateLimited);
        }

        if let Some(msg) = self.error_message {
            // "Invalid API call" is also what a malformed symbol produces
            if msg.contains("Invalid API call") {
                return Ok(None);
            }
            return Err(PriceProviderError::BadResponse(msg));
        }

        let Some(AvGlobalQuote {
            symbol: Some(symbol),
            price: Some(price),
        }) = self.global_quote
        else {
            return Ok(None);
        };

        let dollars = price
            .trim()
            .parse::<f64>()
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;
        let price = to_cents(dollars)
            .ok_or_else(|| PriceProviderError::Parse(format!("bad price {}", dollars)))?;

        // GLOBAL_QUOTE carries no company name
        Ok(Some(Quote {
            name: symbol.clone(),
            symbol,
            price,
        }))
    }
}

#[async_trait]
impl PriceProvider for AlphaVantageProvider {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, PriceProviderError> {
        let Some(symbol) = normalize_symbol(symbol) else {
            return Ok(None);
        };

        let url = "https://www.alphavantage.co/query";

        let resp = self
            .client
            .get(url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", resp.status())));
        }

        resp.json::<AvQuoteResponse>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?
            .into_quote()
    }
}
