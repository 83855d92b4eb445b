use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db;
use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::{Quote, Side, TradeForm, TradeReceipt};
use crate::money::{self, parse_shares};
use crate::services::account_locks::AccountLocks;

/// Checks the form in the order the checks are reported to the user: symbol,
/// then share count. A blank share count is an invalid one.
async fn validate(
    provider: &dyn PriceProvider,
    form: TradeForm,
) -> Result<(Quote, i64), AppError> {
    let symbol = form
        .symbol
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("must provide symbol".into()))?;

    let quote = provider.lookup(&symbol).await?.ok_or(AppError::InvalidSymbol)?;
    let shares = parse_shares(&form.shares.unwrap_or_default())?;
    Ok((quote, shares))
}

/// Buys at the current price. The debit and the ledger row commit together or
/// not at all.
pub async fn buy(
    pool: &SqlitePool,
    provider: &dyn PriceProvider,
    locks: &AccountLocks,
    user_id: i64,
    form: TradeForm,
) -> Result<TradeReceipt, AppError> {
    let (quote, shares) = validate(provider, form).await?;
    let total = money::cost(shares, quote.price)?;

    let _guard = locks.lock(user_id).await;
    let mut tx = pool.begin().await?;

    if !db::account_queries::debit_cash(&mut *tx, user_id, total).await? {
        let exists = db::account_queries::fetch_cash(&mut *tx, user_id).await?.is_some();
        if !exists {
            return Err(AppError::NotFound);
        }
        warn!(
            "User {} cannot afford {} {} for {}",
            user_id,
            shares,
            quote.symbol,
            money::usd(total)
        );
        return Err(AppError::InsufficientFunds);
    }

    db::purchase_queries::insert(&mut *tx, user_id, &quote.symbol, quote.price, shares, Utc::now())
        .await?;

    let cash_after = db::account_queries::fetch_cash(&mut *tx, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    tx.commit().await?;

    info!(
        "User {} bought {} {} at {} for {}",
        user_id,
        shares,
        quote.symbol,
        money::usd(quote.price),
        money::usd(total)
    );

    Ok(TradeReceipt {
        symbol: quote.symbol,
        side: Side::Buy,
        shares,
        price: quote.price,
        total,
        cash_after,
    })
}

/// Sells at the current price, never more than the user holds.
pub async fn sell(
    pool: &SqlitePool,
    provider: &dyn PriceProvider,
    locks: &AccountLocks,
    user_id: i64,
    form: TradeForm,
) -> Result<TradeReceipt, AppError> {
    let (quote, shares) = validate(provider, form).await?;
    let total = money::cost(shares, quote.price)?;

    let _guard = locks.lock(user_id).await;
    let mut tx = pool.begin().await?;

    let held = db::purchase_queries::held_shares(&mut *tx, user_id, &quote.symbol).await?;
    if held < shares {
        warn!(
            "User {} tried to sell {} {} holding {}",
            user_id, shares, quote.symbol, held
        );
        return Err(AppError::InsufficientShares);
    }

    if !db::account_queries::credit_cash(&mut *tx, user_id, total).await? {
        return Err(AppError::NotFound);
    }

    db::purchase_queries::insert(
        &mut *tx,
        user_id,
        &quote.symbol,
        quote.price,
        Side::Sell.signed(shares),
        Utc::now(),
    )
    .await?;

    let cash_after = db::account_queries::fetch_cash(&mut *tx, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    tx.commit().await?;

    info!(
        "User {} sold {} {} at {} for {}",
        user_id,
        shares,
        quote.symbol,
        money::usd(quote.price),
        money::usd(total)
    );

    Ok(TradeReceipt {
        symbol: quote.symbol,
        side: Side::Sell,
        shares,
        price: quote.price,
        total,
        cash_after,
    })
}
