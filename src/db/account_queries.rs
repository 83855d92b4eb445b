use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};
use crate::models::Account;

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    hash: &str,
    cash: i64,
) -> Result<Account, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        "INSERT INTO users (username, hash, cash)
         VALUES (?, ?, ?)
         RETURNING id, username, hash, cash"
    )
    .bind(username)
    .bind(hash)
    .bind(cash)
    .fetch_one(pool)
    .await
}

/// All accounts matching `username`; callers expect zero or one.
pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Vec<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        "SELECT id, username, hash, cash
         FROM users
         WHERE username = ?"
    )
    .bind(username)
    .fetch_all(pool)
    .await
}

pub async fn username_taken(pool: &SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Debits `amount` only if the balance covers it. Returns false when it does not.
pub async fn debit_cash(
    conn: &mut SqliteConnection,
    id: i64,
    amount: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users
         SET cash = cash - ?
         WHERE id = ? AND cash >= ?"
    )
    .bind(amount)
    .bind(id)
    .bind(amount)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn credit_cash(
    conn: &mut SqliteConnection,
    id: i64,
    amount: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET cash = cash + ? WHERE id = ?")
        .bind(amount)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn fetch_cash<'e, E>(executor: E, id: i64) -> Result<Option<i64>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT cash FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}
