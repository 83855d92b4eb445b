use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};
use crate::models::{LedgerEntry, PositionRow};

pub async fn insert(
    conn: &mut SqliteConnection,
    user_id: i64,
    symbol: &str,
    price: i64,
    shares: i64,
    at: DateTime<Utc>,
) -> Result<LedgerEntry, sqlx::Error> {
    sqlx::query_as::<_, LedgerEntry>(
        "INSERT INTO purchases (user_id, stock_symbol, purchase_price, shares, transacted_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING id, user_id, stock_symbol, purchase_price, shares, transacted_at"
    )
    .bind(user_id)
    .bind(symbol)
    .bind(price)
    .bind(shares)
    .bind(at)
    .fetch_one(conn)
    .await
}

/// Net shares per symbol, skipping symbols that have been sold out.
pub async fn fetch_positions<'e, E>(
    executor: E,
    user_id: i64,
) -> Result<Vec<PositionRow>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, PositionRow>(
        "SELECT stock_symbol,
                SUM(shares) AS shares,
                SUM(CASE WHEN shares > 0 THEN shares ELSE 0 END) AS bought_shares,
                SUM(CASE WHEN shares > 0 THEN shares * purchase_price ELSE 0 END) AS bought_cost
         FROM purchases
         WHERE user_id = ?
         GROUP BY stock_symbol
         HAVING SUM(shares) > 0
         ORDER BY stock_symbol ASC"
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn held_shares<'e, E>(
    executor: E,
    user_id: i64,
    symbol: &str,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        "SELECT COALESCE(SUM(shares), 0)
         FROM purchases
         WHERE user_id = ? AND stock_symbol = ?"
    )
    .bind(user_id)
    .bind(symbol)
    .fetch_one(executor)
    .await
}

pub async fn fetch_history(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<LedgerEntry>, sqlx::Error> {
    sqlx::query_as::<_, LedgerEntry>(
        "SELECT id, user_id, stock_symbol, purchase_price, shares, transacted_at
         FROM purchases
         WHERE user_id = ?
         ORDER BY id ASC"
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
