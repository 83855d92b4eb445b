use futures::future::join_all;
use sqlx::SqlitePool;
use tracing::warn;

use crate::db;
use crate::errors::AppError;
use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{HistoryEntry, Holding, PortfolioView, PositionRow, Quote};

/// Cash, current holdings and their market value for one user.
///
/// Each distinct symbol is priced once. A symbol the oracle cannot price is
/// still listed, with no value and an `error`, and is left out of the totals.
pub async fn portfolio(
    pool: &SqlitePool,
    provider: &dyn PriceProvider,
    user_id: i64,
) -> Result<PortfolioView, AppError> {
    let cash = db::account_queries::fetch_cash(pool, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let positions = db::purchase_queries::fetch_positions(pool, user_id).await?;

    let quotes = join_all(
        positions
            .iter()
            .map(|position| provider.lookup(&position.stock_symbol)),
    )
    .await;

    Ok(value_positions(cash, positions, quotes))
}

fn value_positions(
    cash: i64,
    positions: Vec<PositionRow>,
    quotes: Vec<Result<Option<Quote>, PriceProviderError>>,
) -> PortfolioView {
    let mut holdings = Vec::with_capacity(positions.len());
    let mut total_value: i64 = 0;

    for (position, quote) in positions.into_iter().zip(quotes) {
        let purchase_price = position.average_price();
        let mut holding = Holding {
            symbol: position.stock_symbol,
            name: None,
            shares: position.shares,
            purchase_price,
            current_price: None,
            value: None,
            error: None,
        };

        match quote {
            Ok(Some(quote)) => match quote.price.checked_mul(holding.shares) {
                Some(value) => {
                    total_value = total_value.saturating_add(value);
                    holding.name = Some(quote.name);
                    holding.current_price = Some(quote.price);
                    holding.value = Some(value);
                }
                None => holding.error = Some("value out of range".to_string()),
            },
            Ok(None) => {
                warn!("Held symbol {} no longer resolves", holding.symbol);
                holding.error = Some("symbol not found".to_string());
            }
            Err(e) => {
                warn!("Price lookup failed for held symbol {}: {}", holding.symbol, e);
                holding.error = Some(format!("price lookup failed: {}", e));
            }
        }

        holdings.push(holding);
    }

    PortfolioView {
        cash,
        holdings,
        total_value,
        grand_total: cash.saturating_add(total_value),
    }
}

pub async fn history(pool: &SqlitePool, user_id: i64) -> Result<Vec<HistoryEntry>, AppError> {
    let entries = db::purchase_queries::fetch_history(pool, user_id).await?;
    Ok(entries.into_iter().map(HistoryEntry::from).collect())
}
