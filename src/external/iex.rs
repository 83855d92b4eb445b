use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::external::price_provider::{normalize_symbol, PriceProvider, PriceProviderError};
use crate::models::Quote;
use crate::money::to_cents;

const IEX_BASE_URL: &str = "https://cloud.iexapis.com/stable/stock/";

pub struct IexProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl IexProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: IEX_BASE_URL.to_string(),
        }
    }

    fn quote_url(&self, symbol: &str) -> Result<Url, PriceProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PriceProviderError::BadResponse(format!("bad base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PriceProviderError::BadResponse("base url cannot hold a path".into()))?
            .pop_if_empty()
            .push(symbol)
            .push("quote");
        url.query_pairs_mut().append_pair("token", &self.api_key);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IexQuote {
    symbol: String,
    company_name: Option<String>,
    latest_price: Option<f64>,
}

impl IexQuote {
    fn into_quote(self) -> Option<Quote> {
        let price = to_cents(self.latest_price?)?;
        let name = self
            .company_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.symbol.clone());
        Some(Quote {
            symbol: self.symbol.to_uppercase(),
            name,
            price,
        })
    }
}

#[async_trait]
impl PriceProvider for IexProvider {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, PriceProviderError> {
        let Some(symbol) = normalize_symbol(symbol) else {
            return Ok(None);
        };

        let resp = self
            .client
            .get(self.quote_url(&symbol)?)
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        match resp.status() {
            // IEX answers "Unknown symbol" with 404
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::TOO_MANY_REQUESTS => return Err(PriceProviderError::RateLimited),
            s if !s.is_success() => {
                return Err(PriceProviderError::BadResponse(format!("HTTP {}", s)))
            }
            _ => {}
        }

        let body = resp
            .json::<IexQuote>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        Ok(body.into_quote())
    }
}
