use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::{QuoteForm, QuoteView};
use crate::money::usd;

pub async fn quote(provider: &dyn PriceProvider, form: QuoteForm) -> Result<QuoteView, AppError> {
    let symbol = form
        .symbol
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("must provide symbol".into()))?;

    let quote = provider
        .lookup(&symbol)
        .await?
        .ok_or(AppError::InvalidSymbol)?;

    Ok(QuoteView {
        display: format!("A share of {} ({}) costs {}.", quote.name, quote.symbol, usd(quote.price)),
        symbol: quote.symbol,
        name: quote.name,
        price: quote.price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixedPrices;

    #[tokio::test]
    async fn formats_known_symbol() {
        let prices = FixedPrices::new(&[("NFLX", 123_456)]);
        let view = quote(&prices, QuoteForm { symbol: Some("nflx".into()) }).await.unwrap();
        assert_eq!(view.symbol, "NFLX");
        assert_eq!(view.price, 123_456);
        assert_eq!(view.display, "A share of NFLX Inc. (NFLX) costs $1,234.56.");
    }

    #[tokio::test]
    async fn unknown_and_missing_symbols() {
        let prices = FixedPrices::new(&[]);
        assert!(matches!(
            quote(&prices, QuoteForm { symbol: Some("ZZZZ".into()) }).await,
            Err(AppError::InvalidSymbol)
        ));
        assert!(matches!(
            quote(&prices, QuoteForm { symbol: None }).await,
            Err(AppError::InvalidInput(_))
        ));
    }
}
